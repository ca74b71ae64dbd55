//! Puzzles that change from one rewound day to the next.
//!
//! Each picks its variant from a [`PuzzleSeed`], so the same number of
//! rewound days always yields the same riddle and the same maze.

pub mod maze;
pub mod riddle;

use crate::common::resources::day_clock::DayClock;

pub trait PuzzleSeed {
    fn rewind_count(&self) -> u32;
}

impl PuzzleSeed for DayClock {
    fn rewind_count(&self) -> u32 {
        DayClock::rewind_count(self)
    }
}

/// A bare count, e.g. straight out of a save file.
impl PuzzleSeed for u32 {
    fn rewind_count(&self) -> u32 {
        *self
    }
}
