use std::time::Duration;

use bevy::prelude::*;

use super::history::{History, OverflowPolicy, Push, Snapshot};

/// Marks an entity as a recordable actor and carries its playback state.
///
/// The history is volatile: it is never saved and always starts empty.
/// Transitions between recording and playing back are driven from outside
/// through [`Rewinder::set_rewinding`]; the component never flips itself.
#[derive(Clone, Component, Debug, Default)]
pub struct Rewinder {
    history: History,
    rewinding: bool,
    /// Time since the last applied playback step
    accumulator: Duration,
    /// Set once the cap is hit so the warning is not repeated every sample
    saturated: bool,
}

impl Rewinder {
    pub fn new(max_history: usize, policy: OverflowPolicy) -> Self {
        Self {
            history: History::new(max_history, policy),
            ..default()
        }
    }

    pub fn is_rewinding(&self) -> bool {
        self.rewinding
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Enter or leave playback; any in-flight accumulator is discarded.
    pub fn set_rewinding(&mut self, rewinding: bool) {
        self.rewinding = rewinding;
        self.accumulator = Duration::ZERO;
    }

    pub fn push(&mut self, snapshot: Snapshot) -> Push {
        let result = self.history.push(snapshot);
        match result {
            Push::Refused if !self.saturated => {
                self.saturated = true;
                warn!("history full ({} samples), further movement will not rewind", self.history.capacity());
            }
            Push::Stored => self.saturated = false,
            _ => {}
        }
        result
    }

    pub fn pop(&mut self) -> Option<Snapshot> {
        let snapshot = self.history.pop();
        if snapshot.is_some() {
            self.saturated = false;
        }
        snapshot
    }

    /// Advance the playback accumulator by `dt`.
    ///
    /// Returns true when a playback step is due, i.e. the accumulator has
    /// passed `step`; the accumulator then restarts from zero. Always false
    /// while not rewinding.
    pub fn tick(&mut self, dt: Duration, step: Duration) -> bool {
        if !self.rewinding {
            return false;
        }
        self.accumulator += dt;
        if self.accumulator > step {
            self.accumulator = Duration::ZERO;
            return true;
        }
        false
    }

    /// Drop all history and zero the accumulator.
    pub fn clear(&mut self) {
        self.history.clear();
        self.accumulator = Duration::ZERO;
        self.saturated = false;
    }
}
