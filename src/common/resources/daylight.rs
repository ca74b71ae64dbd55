use bevy::prelude::*;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DayPhase {
    #[default]
    Day,
    Night,
}

/// Ambient lighting state, flipped every time a day is rewound.
#[derive(Clone, Copy, Debug, Default, Resource)]
pub struct Daylight {
    phase: DayPhase,
}

impl Daylight {
    pub fn phase(&self) -> DayPhase {
        self.phase
    }

    pub fn toggle(&mut self) -> DayPhase {
        self.phase = match self.phase {
            DayPhase::Day => DayPhase::Night,
            DayPhase::Night => DayPhase::Day,
        };
        self.phase
    }
}
