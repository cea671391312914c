use bevy_ecs::prelude::*;
use bevy_log::info;

use crate::{
    driver::{FollowerTable, Idm, Stepper, Trajectory},
    Error,
};

/// A follower run owned by an entity and stepped by [`advance_followers`].
#[derive(Component, Debug)]
pub struct FollowerRun {
    pub vehicle: u32,
    pub stepper: Stepper,
}

impl FollowerRun {
    pub fn new(vehicle: u32, idm: Idm, trajectory: Trajectory) -> Result<Self, Error> {
        Ok(Self {
            vehicle,
            stepper: Stepper::new(idm, trajectory)?,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.stepper.is_finished()
    }

    /// Finishes any remaining steps and packages the result.
    pub fn into_table(self) -> FollowerTable {
        let idm = *self.stepper.idm();
        FollowerTable::new(self.vehicle, &idm, self.stepper.finish())
    }
}

/// Marks a run whose buffer is full.
#[derive(Component, Debug, Default)]
pub struct Completed;

/// Steps each run may take per update.
#[derive(Resource, Debug, Clone, Copy)]
pub struct StepBudget(pub usize);

impl Default for StepBudget {
    fn default() -> Self {
        Self(1)
    }
}

pub fn advance_followers(
    mut commands: Commands,
    budget: Res<StepBudget>,
    mut runs: Query<(Entity, &mut FollowerRun), Without<Completed>>,
) {
    for (entity, mut run) in &mut runs {
        let FollowerRun { vehicle, stepper } = &mut *run;

        for _ in stepper.by_ref().take(budget.0) {}

        if stepper.is_finished() {
            info!("follower {vehicle} finished after {} steps", stepper.index());
            commands.entity(entity).insert(Completed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::driver::{run, FollowerState, LeaderTrace};

    fn follower_run(vehicle: u32, samples: usize) -> FollowerRun {
        let leader = LeaderTrace::constant_speed(30.0, 20.0, 0.1, samples);
        let trajectory =
            Trajectory::new(samples, leader, FollowerState::new(0.0, 20.0)).unwrap();
        FollowerRun::new(vehicle, Idm::default(), trajectory).unwrap()
    }

    fn schedule() -> Schedule {
        let mut schedule = Schedule::default();
        schedule.add_systems(advance_followers);
        schedule
    }

    #[test]
    fn advances_by_budget_and_marks_completion() {
        let mut world = World::new();
        world.insert_resource(StepBudget(2));
        let entity = world.spawn(follower_run(1, 5)).id();
        let mut schedule = schedule();

        schedule.run(&mut world);
        assert_eq!(world.get::<FollowerRun>(entity).unwrap().stepper.index(), 2);
        assert!(world.get::<Completed>(entity).is_none());

        schedule.run(&mut world);
        assert_eq!(world.get::<FollowerRun>(entity).unwrap().stepper.index(), 4);
        assert!(world.get::<Completed>(entity).is_some());
    }

    #[test]
    fn runs_are_independent() {
        let mut world = World::new();
        world.init_resource::<StepBudget>();
        let short = world.spawn(follower_run(1, 2)).id();
        let long = world.spawn(follower_run(2, 4)).id();
        let mut schedule = schedule();

        schedule.run(&mut world);
        assert!(world.get::<Completed>(short).is_some());
        assert!(world.get::<Completed>(long).is_none());

        schedule.run(&mut world);
        schedule.run(&mut world);
        assert!(world.get::<Completed>(long).is_some());
        assert_eq!(world.get::<FollowerRun>(short).unwrap().stepper.index(), 1);
    }

    #[test]
    fn stepped_run_matches_one_shot_run() {
        let mut world = World::new();
        world.init_resource::<StepBudget>();
        let entity = world.spawn(follower_run(3, 6)).id();
        let mut schedule = schedule();
        for _ in 0..5 {
            schedule.run(&mut world);
        }

        let stepped = world
            .entity_mut(entity)
            .take::<FollowerRun>()
            .unwrap()
            .into_table();

        let leader = LeaderTrace::constant_speed(30.0, 20.0, 0.1, 6);
        let trajectory = Trajectory::new(6, leader, FollowerState::new(0.0, 20.0)).unwrap();
        let idm = Idm::default();
        let expected = FollowerTable::new(3, &idm, run(idm, trajectory).unwrap());

        assert_eq!(stepped, expected);
    }

    #[test]
    fn into_table_finishes_pending_steps() {
        let table = follower_run(4, 3).into_table();
        assert_eq!(table.len(), 3);
        assert!(table.speed[2] > 0.0);
    }
}
