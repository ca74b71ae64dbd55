use std::time::Duration;

use bevy::prelude::*;

/// Walks back and forth, reversing direction every `interval`.
///
/// Drives the player in the headless sim where there is no keyboard.
#[derive(Clone, Component, Copy, Debug)]
pub struct Patrol {
    pub speed: f32,
    pub interval: Duration,
    elapsed: Duration,
    /// +1 walking right, -1 walking left
    direction: f32,
}

impl Patrol {
    pub fn new(speed: f32, interval: Duration) -> Self {
        Self { speed, interval, elapsed: Duration::ZERO, direction: 1. }
    }

    /// Advance by `dt`; returns true when the patrol turned around.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            self.direction = -self.direction;
            return true;
        }
        false
    }

    pub fn velocity_x(&self) -> f32 {
        self.speed * self.direction
    }
}
