use bevy::prelude::*;

/// Raised by the dialog/message layer while a modal is on screen.
///
/// The day clock polls this once per tick: while blocking, time does not
/// advance and nothing is recorded. A rewind already in progress keeps going.
#[derive(Clone, Copy, Debug, Default, Resource)]
pub struct InteractionGate {
    blocking: bool,
}

impl InteractionGate {
    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    pub fn block(&mut self) {
        self.blocking = true;
    }

    pub fn unblock(&mut self) {
        self.blocking = false;
    }
}
