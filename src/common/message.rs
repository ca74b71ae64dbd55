use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::common::resources::day_clock::RewindCause;

/// Clock entered rewind mode.
#[derive(Clone, Copy, Debug, Deserialize, Event, PartialEq, Serialize)]
pub struct RewindStarted {
    pub cause: RewindCause,
}

/// A manual rewind was released before reaching the start of the day.
#[derive(Clone, Copy, Debug, Default, Deserialize, Event, PartialEq, Serialize)]
pub struct RewindCancelled;

/// A full day was rewound. Fire-and-forget; lighting, music and puzzles
/// subscribe to this.
#[derive(Clone, Copy, Debug, Deserialize, Event, PartialEq, Serialize)]
pub struct DayRewound {
    pub rewind_count: u32,
}
