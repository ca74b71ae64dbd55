use bevy::prelude::*;

use crate::common::{
    message::{DayRewound, RewindCancelled, RewindStarted},
    resources::{
        config::{ConfigError, RewindConfig},
        day_clock::DayClock,
        daylight::Daylight,
        gate::InteractionGate,
    },
    systems::{actor, clock, lighting},
};

/// Frame order for everything that touches the day clock.
///
/// Actors join or leave before the clock ticks; the clock broadcasts before
/// any actor steps its playback; motion runs last on whatever state results.
#[derive(Clone, Debug, Eq, Hash, PartialEq, SystemSet)]
pub enum RewindSet {
    Track,
    Clock,
    Actors,
    Motion,
}

/// Plugin that owns the day clock and every recordable actor.
///
/// This plugin provides:
/// - The `DayClock`, `InteractionGate` and `Daylight` resources
/// - Actor registration as `Rewinder`s come and go
/// - Per-frame recording, rewinding and day reset
/// - `RewindStarted`, `RewindCancelled` and `DayRewound` events
///
/// Keyboard input is read from `ButtonInput<KeyCode>`; add `InputPlugin`
/// (or `DefaultPlugins`) to feed it.
pub struct RewindPlugin {
    config: RewindConfig,
}

impl RewindPlugin {
    pub fn new(config: RewindConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl Default for RewindPlugin {
    fn default() -> Self {
        Self { config: RewindConfig::default() }
    }
}

impl Plugin for RewindPlugin {
    fn build(&self, app: &mut App) {
        let clock = DayClock::new(&self.config);
        if !clock.is_enabled() {
            info!("day clock disabled");
        }
        app.insert_resource(self.config.clone());
        app.insert_resource(clock);
        app.init_resource::<InteractionGate>();
        app.init_resource::<Daylight>();
        app.init_resource::<ButtonInput<KeyCode>>();

        app.add_event::<RewindStarted>();
        app.add_event::<RewindCancelled>();
        app.add_event::<DayRewound>();

        app.configure_sets(
            Update,
            (RewindSet::Track, RewindSet::Clock, RewindSet::Actors, RewindSet::Motion).chain(),
        );
        app.add_systems(
            Update,
            (
                clock::track_actors.in_set(RewindSet::Track),
                clock::tick.in_set(RewindSet::Clock),
                actor::step_rewind.in_set(RewindSet::Actors),
                lighting::toggle_on_day_rewound.in_set(RewindSet::Actors),
                (actor::walk, actor::patrol, actor::integrate).chain().in_set(RewindSet::Motion),
            ),
        );
    }
}
