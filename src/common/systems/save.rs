use bevy::prelude::*;

use crate::common::{
    components::{rewinder::Rewinder, Player},
    message::DayRewound,
    resources::day_clock::DayClock,
    save::{SaveData, SaveSlot},
};

/// Startup: pick up where the last session left off.
///
/// A missing save starts a fresh game; an unreadable one is logged and
/// ignored rather than aborting.
pub fn restore(
    slot: Res<SaveSlot>,
    mut clock: ResMut<DayClock>,
    mut players: Query<(&mut Transform, Option<&mut Rewinder>), With<Player>>,
) {
    let save = match slot.load() {
        Ok(Some(save)) => save,
        Ok(None) => {
            info!("no save at {}, starting a new game", slot.path().display());
            return;
        }
        Err(err) => {
            error!("ignoring save at {}: {err}", slot.path().display());
            return;
        }
    };

    clock.restore(save.rewind_count);
    for (mut transform, rewinder) in &mut players {
        let position = Vec2::from(save.player);
        transform.translation.x = position.x;
        transform.translation.y = position.y;
        if let Some(mut rewinder) = rewinder {
            rewinder.clear();
        }
    }
    info!("restored save: {} day(s) rewound", save.rewind_count);
}

/// Write a save every time a day is rewound.
pub fn autosave(
    mut reader: EventReader<DayRewound>,
    slot: Res<SaveSlot>,
    clock: Res<DayClock>,
    players: Query<&Transform, With<Player>>,
) {
    if reader.read().last().is_none() {
        return;
    }
    let Ok(transform) = players.single() else {
        warn!("autosave skipped: expected exactly one player");
        return;
    };

    let save = SaveData::capture(&clock, transform.translation.truncate());
    match slot.store(&save) {
        Ok(()) => info!("saved to {}", slot.path().display()),
        Err(err) => error!("autosave failed: {err}"),
    }
}
