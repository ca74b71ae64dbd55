//! # Recordable capability
//!
//! Anything that can log its own kinematic state and be played backward
//! implements [`Recordable`]. The day clock only ever talks to actors through
//! this trait, so unrelated entity kinds can opt in without sharing a base type.
//!
//! [`RecordableActor`] is the ECS binding: a short-lived view over one
//! entity's `Transform`, `Velocity`, `Rewinder` and optional `Home`.

use bevy::prelude::*;

use crate::common::components::{
    history::{Push, Snapshot},
    rewinder::Rewinder,
    Home, Velocity,
};

pub trait Recordable {
    /// Append the current state to history, unless history is full.
    fn record(&mut self);

    /// Pop the latest snapshot and apply it. No-op on empty history.
    fn rewind(&mut self);

    /// Enter or leave playback mode.
    fn set_rewind(&mut self, rewinding: bool);

    /// Hard reset for a new day. Optional; does nothing unless overridden.
    fn reset(&mut self) {}
}

pub struct RecordableActor<'a> {
    pub transform: Mut<'a, Transform>,
    pub velocity: Mut<'a, Velocity>,
    pub rewinder: Mut<'a, Rewinder>,
    pub home: Option<&'a Home>,
}

impl<'a> RecordableActor<'a> {
    pub fn new(
        (transform, velocity, rewinder, home): (Mut<'a, Transform>, Mut<'a, Velocity>, Mut<'a, Rewinder>, Option<&'a Home>),
    ) -> Self {
        Self { transform, velocity, rewinder, home }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.transform.translation.x, self.transform.translation.y, self.velocity.x)
    }
}

impl Recordable for RecordableActor<'_> {
    fn record(&mut self) {
        let snapshot = self.snapshot();
        if self.rewinder.push(snapshot) == Push::Refused {
            trace!("dropped sample at ({}, {})", snapshot.x, snapshot.y);
        }
    }

    fn rewind(&mut self) {
        let Some(snapshot) = self.rewinder.pop() else { return };
        self.transform.translation.x = snapshot.x;
        self.transform.translation.y = snapshot.y;
        // moving right while recorded reads as moving left while rewinding
        self.velocity.x = -snapshot.velocity_x;
    }

    fn set_rewind(&mut self, rewinding: bool) {
        self.rewinder.set_rewinding(rewinding);
    }

    fn reset(&mut self) {
        self.rewinder.clear();
        if let Some(&Home(home)) = self.home {
            self.transform.translation.x = home.x;
            self.transform.translation.y = home.y;
            self.velocity.0 = Vec2::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::components::history::OverflowPolicy;

    fn spawn_actor(world: &mut World, x: f32, y: f32, vx: f32) -> Entity {
        world
            .spawn((
                Transform::from_xyz(x, y, 0.),
                Velocity(Vec2::new(vx, 0.)),
                Rewinder::new(1000, OverflowPolicy::KeepOldest),
            ))
            .id()
    }

    fn with_actor<R>(world: &mut World, ent: Entity, f: impl FnOnce(&mut RecordableActor) -> R) -> R {
        let mut query = world.query::<(&mut Transform, &mut Velocity, &mut Rewinder, Option<&Home>)>();
        let parts = query.get_mut(world, ent).unwrap();
        let mut actor = RecordableActor::new(parts);
        f(&mut actor)
    }

    fn position(world: &World, ent: Entity) -> Vec2 {
        world.get::<Transform>(ent).unwrap().translation.truncate()
    }

    #[test]
    fn test_rewind_applies_position_and_negated_velocity() {
        let mut world = World::new();
        let ent = spawn_actor(&mut world, 10., 0., 5.);

        with_actor(&mut world, ent, |a| a.record());

        // Move somewhere else before rewinding
        world.get_mut::<Transform>(ent).unwrap().translation = Vec3::new(40., 7., 0.);

        with_actor(&mut world, ent, |a| a.rewind());

        assert_eq!(position(&world, ent), Vec2::new(10., 0.));
        assert_eq!(world.get::<Velocity>(ent).unwrap().x, -5.);
        assert!(world.get::<Rewinder>(ent).unwrap().history().is_empty());
    }

    #[test]
    fn test_rewind_on_empty_history_leaves_state_unchanged() {
        let mut world = World::new();
        let ent = spawn_actor(&mut world, 3., 4., 2.);

        with_actor(&mut world, ent, |a| {
            a.rewind();
            a.rewind();
        });

        assert_eq!(position(&world, ent), Vec2::new(3., 4.));
        assert_eq!(world.get::<Velocity>(ent).unwrap().x, 2.);
    }

    #[test]
    fn test_round_trip_returns_to_start() {
        let mut world = World::new();
        let ent = spawn_actor(&mut world, 0., 0., 2.);

        // Walk right, recording each step
        for step in 0..20 {
            world.get_mut::<Transform>(ent).unwrap().translation.x = step as f32 * 2.;
            with_actor(&mut world, ent, |a| a.record());
        }
        world.get_mut::<Transform>(ent).unwrap().translation.x = 100.;

        with_actor(&mut world, ent, |a| {
            a.set_rewind(true);
            for _ in 0..20 {
                a.rewind();
            }
        });

        assert_eq!(position(&world, ent), Vec2::ZERO);
        assert!(world.get::<Rewinder>(ent).unwrap().history().is_empty());
    }

    #[test]
    fn test_record_respects_cap() {
        let mut world = World::new();
        let ent = world
            .spawn((Transform::default(), Velocity::default(), Rewinder::new(3, OverflowPolicy::KeepOldest)))
            .id();

        with_actor(&mut world, ent, |a| {
            for _ in 0..10 {
                a.record();
            }
        });

        assert_eq!(world.get::<Rewinder>(ent).unwrap().history().len(), 3);
    }

    #[test]
    fn test_reset_returns_home_and_clears_history() {
        let mut world = World::new();
        let ent = spawn_actor(&mut world, 50., 60., 9.);
        world.entity_mut(ent).insert(Home(Vec2::new(1., 2.)));

        with_actor(&mut world, ent, |a| {
            a.record();
            a.record();
            a.reset();
        });

        assert_eq!(position(&world, ent), Vec2::new(1., 2.));
        assert_eq!(world.get::<Velocity>(ent).unwrap().0, Vec2::ZERO);
        assert!(world.get::<Rewinder>(ent).unwrap().history().is_empty());
    }

    #[test]
    fn test_reset_without_home_keeps_position() {
        let mut world = World::new();
        let ent = spawn_actor(&mut world, 50., 60., 9.);

        with_actor(&mut world, ent, |a| {
            a.record();
            a.reset();
        });

        assert_eq!(position(&world, ent), Vec2::new(50., 60.));
        assert!(world.get::<Rewinder>(ent).unwrap().history().is_empty());
    }
}
