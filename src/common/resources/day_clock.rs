//! # Day Clock
//!
//! Single authority over elapsed in-day time and over the record/rewind mode
//! of every registered actor.
//!
//! ```text
//!            manual press / day expired
//!  Forward ─────────────────────────────▶ Rewinding
//!  (advance time,                         (time runs backward at
//!   record every interval)                 rewind_multiplier speed)
//!     ▲                                        │
//!     │   manual release above zero: cancel    │
//!     ├────────────────────────────────────────┤
//!     │   reached zero: reset actors,          │
//!     └── rewind_count += 1 ◀──────────────────┘
//! ```
//!
//! The clock itself never touches actors. Each call returns at most one
//! [`Broadcast`] per frame, which the caller delivers to every registered
//! actor through [`Recordable`]. One broadcast per frame means an actor can
//! never be told to record and to start rewinding in the same frame.

use std::{fmt, time::Duration};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::common::{recordable::Recordable, resources::config::RewindConfig};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RewindCause {
    /// The day ran out
    Expired,
    /// The player is holding the rewind key
    Manual,
}

/// Instruction for every registered actor, produced by a clock transition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Broadcast {
    /// Record this many samples (more than one only after a long frame)
    Record { samples: u32 },
    BeginRewind(RewindCause),
    /// `completed` is true when time reached zero; only then are actors reset
    EndRewind { completed: bool },
}

impl Broadcast {
    pub fn deliver<R: Recordable + ?Sized>(self, actor: &mut R) {
        match self {
            Broadcast::Record { samples } => {
                for _ in 0..samples {
                    actor.record();
                }
            }
            Broadcast::BeginRewind(_) => actor.set_rewind(true),
            Broadcast::EndRewind { completed } => {
                actor.set_rewind(false);
                if completed {
                    actor.reset();
                }
            }
        }
    }
}

#[derive(Clone, Debug, Resource)]
pub struct DayClock {
    current_time: Duration,
    day_duration: Duration,
    sampling_interval: Duration,
    rewind_multiplier: f32,
    max_frame_delta: Duration,
    enabled: bool,
    /// Some while rewinding, remembering what started it
    rewinding: Option<RewindCause>,
    /// Forward time since the last recording
    sample_accumulator: Duration,
    /// Completed full-day rewinds; persisted and used as a puzzle seed
    rewind_count: u32,
    /// Weak handles: the clock addresses actors but never owns them
    actors: Vec<Entity>,
}

impl Default for DayClock {
    fn default() -> Self {
        Self::new(&RewindConfig::default())
    }
}

impl DayClock {
    pub fn new(config: &RewindConfig) -> Self {
        Self {
            current_time: Duration::ZERO,
            day_duration: config.day_duration,
            sampling_interval: config.sampling_interval,
            rewind_multiplier: config.rewind_multiplier,
            max_frame_delta: config.max_frame_delta,
            enabled: config.enabled,
            rewinding: None,
            sample_accumulator: Duration::ZERO,
            rewind_count: 0,
            actors: Vec::new(),
        }
    }

    /// Restore persisted state. Time always restarts at the top of the day.
    pub fn restore(&mut self, rewind_count: u32) {
        self.rewind_count = rewind_count;
        self.current_time = Duration::ZERO;
        self.sample_accumulator = Duration::ZERO;
        self.rewinding = None;
    }

    pub fn current_time(&self) -> Duration {
        self.current_time
    }

    pub fn day_duration(&self) -> Duration {
        self.day_duration
    }

    pub fn sample_accumulator(&self) -> Duration {
        self.sample_accumulator
    }

    pub fn rewind_count(&self) -> u32 {
        self.rewind_count
    }

    pub fn is_rewinding(&self) -> bool {
        self.rewinding.is_some()
    }

    pub fn rewind_cause(&self) -> Option<RewindCause> {
        self.rewinding
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True once the day has run past its end (strictly greater).
    pub fn is_expired(&self) -> bool {
        self.current_time > self.day_duration
    }

    pub fn actors(&self) -> &[Entity] {
        &self.actors
    }

    /// Returns false if already registered.
    pub fn register(&mut self, ent: Entity) -> bool {
        if self.actors.contains(&ent) {
            return false;
        }
        self.actors.push(ent);
        true
    }

    /// Returns false if not registered.
    pub fn unregister(&mut self, ent: Entity) -> bool {
        let before = self.actors.len();
        self.actors.retain(|&a| a != ent);
        self.actors.len() != before
    }

    /// Advance one frame.
    ///
    /// While `blocked` (a modal dialog is up) forward time stands still and
    /// nothing records, but a rewind in progress continues.
    pub fn update(&mut self, dt: Duration, blocked: bool) -> Option<Broadcast> {
        if !self.enabled {
            return None;
        }
        let dt = dt.min(self.max_frame_delta);

        let mut began = None;
        if self.rewinding.is_none() && !blocked && self.is_expired() {
            began = Some(self.begin(RewindCause::Expired));
        }

        if self.rewinding.is_some() {
            if self.current_time.is_zero() {
                return Some(self.complete());
            }
            let step = Duration::try_from_secs_f64(dt.as_secs_f64() * f64::from(self.rewind_multiplier))
                .unwrap_or(Duration::MAX);
            self.current_time = self.current_time.saturating_sub(step);
            return began;
        }

        if blocked {
            return None;
        }

        self.sample_accumulator += dt;
        let accumulated = self.sample_accumulator.as_nanos();
        let interval = self.sampling_interval.as_nanos();
        // Samples past u32::MAX in one frame are dropped, not carried
        let samples = u32::try_from(accumulated / interval).unwrap_or(u32::MAX);
        self.sample_accumulator = Duration::from_nanos(u64::try_from(accumulated % interval).unwrap_or(u64::MAX));
        self.current_time += dt;

        // The frame that crosses the end of the day starts the rewind
        // instead of recording.
        if self.is_expired() {
            return Some(self.begin(RewindCause::Expired));
        }

        (samples > 0).then_some(Broadcast::Record { samples })
    }

    /// Rewind key pressed.
    pub fn begin_rewind(&mut self) -> Option<Broadcast> {
        if !self.enabled || self.rewinding.is_some() {
            return None;
        }
        Some(self.begin(RewindCause::Manual))
    }

    /// Rewind key released. Cancels a manual rewind without resetting anyone
    /// or counting a day; an expired day always rewinds all the way.
    ///
    /// Released once time has already reached zero, the day completes as it
    /// would have on the next tick.
    pub fn release_rewind(&mut self) -> Option<Broadcast> {
        if self.rewind_cause() != Some(RewindCause::Manual) {
            return None;
        }
        if self.current_time.is_zero() {
            return Some(self.complete());
        }
        self.rewinding = None;
        debug!("rewind released at {:?}", self.current_time);
        Some(Broadcast::EndRewind { completed: false })
    }

    fn begin(&mut self, cause: RewindCause) -> Broadcast {
        self.rewinding = Some(cause);
        debug!("rewind started ({cause:?}) at {:?}", self.current_time);
        Broadcast::BeginRewind(cause)
    }

    fn complete(&mut self) -> Broadcast {
        self.rewinding = None;
        self.sample_accumulator = Duration::ZERO;
        self.rewind_count += 1;
        debug!("day rewound, count now {}", self.rewind_count);
        Broadcast::EndRewind { completed: true }
    }

    /// Fraction of the day elapsed, in `[0, 1]`.
    pub fn day_progress(&self) -> f32 {
        (self.current_time.as_secs_f32() / self.day_duration.as_secs_f32()).clamp(0., 1.)
    }

    pub fn time_of_day(&self) -> ClockFace {
        ClockFace::at(self.day_progress())
    }
}

/// Minutes past midnight when a day begins (7:00 AM).
const DAWN_MINUTES: f32 = 7. * 60.;
/// A day spans 7:00 AM to midnight.
const DAY_SPAN_MINUTES: f32 = 17. * 60.;

/// Wall-clock reading for a point in the day.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ClockFace {
    pub minutes_since_midnight: u32,
}

impl ClockFace {
    pub fn at(progress: f32) -> Self {
        let minutes = DAWN_MINUTES + progress.clamp(0., 1.) * DAY_SPAN_MINUTES;
        Self { minutes_since_midnight: minutes.floor() as u32 }
    }

    /// 0..12, where 0 reads as 12
    pub fn hours(&self) -> u32 {
        (self.minutes_since_midnight / 60) % 12
    }

    pub fn minutes(&self) -> u32 {
        self.minutes_since_midnight % 60
    }

    pub fn is_pm(&self) -> bool {
        (self.minutes_since_midnight / 60) % 24 >= 12
    }

    /// Hour hand angle in degrees, 180 at midnight.
    pub fn hand_angle(&self) -> f32 {
        self.minutes_since_midnight as f32 / 720. * 360. + 180.
    }
}

impl fmt::Display for ClockFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = match self.hours() {
            0 => 12,
            h => h,
        };
        write!(f, "{}:{:02} {}", hours, self.minutes(), if self.is_pm() { "PM" } else { "AM" })
    }
}
