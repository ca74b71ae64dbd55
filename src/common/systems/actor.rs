use bevy::prelude::*;

use crate::common::{
    components::{patrol::Patrol, rewinder::Rewinder, PlayerControlled, Velocity},
    recordable::{Recordable, RecordableActor},
    resources::{config::RewindConfig, gate::InteractionGate},
    systems::clock::ActorQuery,
};

/// Play history back on every rewinding actor at its own cadence.
pub fn step_rewind(time: Res<Time>, config: Res<RewindConfig>, mut query: ActorQuery) {
    let dt = config.clamp_delta(time.delta());
    let step = config.rewind_step();
    for parts in &mut query {
        let mut actor = RecordableActor::new(parts);
        if actor.rewinder.tick(dt, step) {
            actor.rewind();
        }
    }
}

/// Keyboard walking. Frozen while a dialog is up or the actor is rewinding.
pub fn walk(
    config: Res<RewindConfig>,
    keyboard: Res<ButtonInput<KeyCode>>,
    gate: Res<InteractionGate>,
    mut query: Query<(&mut Velocity, Option<&Rewinder>), (With<PlayerControlled>, Without<Patrol>)>,
) {
    for (mut velocity, rewinder) in &mut query {
        if rewinder.is_some_and(Rewinder::is_rewinding) {
            continue;
        }

        let left = keyboard.any_pressed(config.left_keys);
        let right = keyboard.any_pressed(config.right_keys);
        let x = match (left, right) {
            _ if gate.is_blocking() => 0.,
            (true, false) => -config.walk_speed,
            (false, true) => config.walk_speed,
            _ => 0.,
        };
        if velocity.x != x {
            velocity.x = x;
        }
    }
}

pub fn patrol(
    time: Res<Time>,
    config: Res<RewindConfig>,
    gate: Res<InteractionGate>,
    mut query: Query<(&mut Patrol, &mut Velocity, Option<&Rewinder>)>,
) {
    let dt = config.clamp_delta(time.delta());
    for (mut patrol, mut velocity, rewinder) in &mut query {
        if gate.is_blocking() || rewinder.is_some_and(Rewinder::is_rewinding) {
            continue;
        }
        if patrol.advance(dt) {
            trace!("patrol turned, now heading {}", patrol.velocity_x());
        }
        velocity.x = patrol.velocity_x();
    }
}

/// Move actors along their velocity. Rewinding actors are placed by their
/// history instead.
pub fn integrate(
    time: Res<Time>,
    config: Res<RewindConfig>,
    mut query: Query<(&mut Transform, &Velocity, Option<&Rewinder>)>,
) {
    let dt = config.clamp_delta(time.delta()).as_secs_f32();
    for (mut transform, velocity, rewinder) in &mut query {
        if velocity.0 == Vec2::ZERO || rewinder.is_some_and(Rewinder::is_rewinding) {
            continue;
        }
        transform.translation += velocity.extend(0.) * dt;
    }
}
