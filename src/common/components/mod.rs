pub mod history;
pub mod patrol;
pub mod rewinder;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Where the player stands at the start of a fresh game.
pub const PLAYER_START: Vec2 = Vec2::new(920., 1500.);

/// The actor whose position is saved between sessions.
#[derive(Clone, Component, Copy, Default)]
pub struct Player;

/// Driven by keyboard input.
#[derive(Clone, Component, Copy, Default)]
pub struct PlayerControlled;

/// World units per second.
#[derive(Clone, Component, Copy, Debug, Default, Deref, DerefMut, Deserialize, PartialEq, Serialize)]
pub struct Velocity(pub Vec2);

/// Canonical position an actor is put back to when its day resets.
#[derive(Clone, Component, Copy, Debug, Default, Deref, DerefMut, Deserialize, PartialEq, Serialize)]
pub struct Home(pub Vec2);
