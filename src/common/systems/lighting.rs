use bevy::prelude::*;

use crate::common::{message::DayRewound, resources::daylight::Daylight};

pub fn toggle_on_day_rewound(mut reader: EventReader<DayRewound>, mut daylight: ResMut<Daylight>) {
    for &DayRewound { rewind_count } in reader.read() {
        let phase = daylight.toggle();
        info!("day {rewind_count} rewound, lighting now {phase:?}");
    }
}
