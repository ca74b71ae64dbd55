use bevy::prelude::*;

use crate::common::{
    components::{rewinder::Rewinder, Home, Velocity},
    message::{DayRewound, RewindCancelled, RewindStarted},
    recordable::RecordableActor,
    resources::{
        config::RewindConfig,
        day_clock::{Broadcast, DayClock, RewindCause},
        gate::InteractionGate,
    },
};

/// Everything a [`RecordableActor`] view borrows from one entity
pub type ActorQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut Transform,
        &'static mut Velocity,
        &'static mut Rewinder,
        Option<&'static Home>,
    ),
>;

/// Keep the clock's actor registry in step with entities carrying a `Rewinder`.
///
/// Runs before the clock ticks, so scene changes never land mid-broadcast.
/// An actor that shows up while a rewind is under way joins it.
pub fn track_actors(
    mut clock: ResMut<DayClock>,
    mut added: Query<(Entity, &mut Rewinder), Added<Rewinder>>,
    mut removed: RemovedComponents<Rewinder>,
) {
    for ent in removed.read() {
        if clock.unregister(ent) {
            debug!("actor {ent:?} left the clock");
        }
    }

    for (ent, mut rewinder) in &mut added {
        if clock.register(ent) {
            let history = rewinder.history();
            debug!(
                "actor {ent:?} joined the clock ({} snapshots, {:?})",
                history.capacity(),
                history.policy()
            );
            if clock.is_rewinding() {
                rewinder.set_rewinding(true);
            }
        }
    }
}

/// Per-frame clock update: manual rewind input first, otherwise the regular
/// tick. Whatever transition results is delivered to every registered actor
/// and announced.
#[allow(clippy::too_many_arguments)]
pub fn tick(
    time: Res<Time>,
    config: Res<RewindConfig>,
    keyboard: Res<ButtonInput<KeyCode>>,
    gate: Res<InteractionGate>,
    mut clock: ResMut<DayClock>,
    mut actors: ActorQuery,
    mut started: EventWriter<RewindStarted>,
    mut cancelled: EventWriter<RewindCancelled>,
    mut rewound: EventWriter<DayRewound>,
) {
    // A frame with a manual transition does not also tick
    let manual = if keyboard.just_pressed(config.rewind_key) {
        clock.begin_rewind()
    } else if keyboard.just_released(config.rewind_key) {
        clock.release_rewind()
    } else {
        None
    };
    let Some(broadcast) = manual.or_else(|| clock.update(time.delta(), gate.is_blocking())) else {
        return;
    };

    // Copy the handles; the registry must not shift under the broadcast
    let registered = clock.actors().to_vec();
    for ent in registered {
        let Ok(parts) = actors.get_mut(ent) else {
            debug!("actor {ent:?} no longer exists, skipping");
            continue;
        };
        broadcast.deliver(&mut RecordableActor::new(parts));
    }

    match broadcast {
        Broadcast::Record { samples } => {
            trace!(
                "recorded {samples} sample(s) at {:?}, {:?} carried",
                clock.current_time(),
                clock.sample_accumulator()
            );
        }
        Broadcast::BeginRewind(cause) => {
            if cause == RewindCause::Expired {
                info!("day over, rewinding");
            }
            started.write(RewindStarted { cause });
        }
        Broadcast::EndRewind { completed: false } => {
            cancelled.write(RewindCancelled);
        }
        Broadcast::EndRewind { completed: true } => {
            info!("day rewound ({} so far)", clock.rewind_count());
            rewound.write(DayRewound { rewind_count: clock.rewind_count() });
        }
    }
}
