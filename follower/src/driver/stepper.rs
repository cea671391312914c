//! Forward stepping of the follower behind an exogenous leader.
//!
//! Each step reads index `t` (and the leader at `t + 1`) and writes the
//! follower at `t + 1`:
//!
//! ```text
//! bn[t]   = max(idm(vn[t], frsn[t], sn_star[t]), -b)
//! vn[t+1] = max(vn[t] + bn[t] * dt, 0)
//! xn[t+1] = xn[t] + vn[t] * dt + 0.5 * bn[t] * dt^2
//! ```

use std::iter::FusedIterator;

use bevy_log::{debug, warn};

use crate::{
    driver::{Idm, Trajectory, MIN_GAP},
    Error,
};

/// Everything one step decided, with kinematics taken at `index + 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub index: usize,
    pub desired_spacing: Option<f64>,
    pub acceleration: f64,
    pub speed: f64,
    pub position: f64,
    pub spacing: f64,
    pub gap: f64,
    pub delta_speed: f64,
}

/// Lazy, finite stepping over a validated run.
///
/// Yields one [`Step`] per time index until the buffer is full. It cannot be
/// rewound; [`Stepper::finish`] drains what is left and hands the buffer back.
#[derive(Debug, Clone)]
pub struct Stepper {
    idm: Idm,
    trajectory: Trajectory,
    index: usize,
    degenerate_steps: usize,
}

impl Stepper {
    /// Validates `idm` and takes ownership of `trajectory`.
    pub fn new(idm: Idm, mut trajectory: Trajectory) -> Result<Self, Error> {
        idm.validate()?;
        trajectory.prime(idm.leader_length);

        let gap = trajectory.gap[0];
        if gap < MIN_GAP {
            warn!("initial gap {gap:.4} m is below the {MIN_GAP} m floor");
        }

        Ok(Self {
            idm,
            trajectory,
            index: 0,
            degenerate_steps: 0,
        })
    }

    pub fn idm(&self) -> &Idm {
        &self.idm
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Index of the next sample to read from.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_finished(&self) -> bool {
        self.index + 1 >= self.trajectory.len()
    }

    /// Steps whose gap had to be raised to [`MIN_GAP`].
    pub fn degenerate_steps(&self) -> usize {
        self.degenerate_steps
    }

    /// Runs the remaining steps and returns the filled buffer.
    pub fn finish(mut self) -> Trajectory {
        for _ in self.by_ref() {}
        self.trajectory
    }

    /// Returns the buffer as it stands, possibly only partly filled.
    pub fn into_trajectory(self) -> Trajectory {
        self.trajectory
    }

    fn advance(&mut self) -> Step {
        let t = self.index;
        let dt = self.idm.resolution;
        let tr = &mut self.trajectory;

        let speed = tr.speed[t];
        let gap = tr.gap[t];

        let desired_spacing = self.idm.desired_spacing(speed, tr.delta_speed[t]);
        if desired_spacing.is_some() && gap < MIN_GAP {
            self.degenerate_steps += 1;
            debug!("step {t}: gap {gap:.4} m raised to {MIN_GAP} m");
        }

        let acceleration = self.idm.acceleration(speed, gap, desired_spacing);
        tr.desired_spacing[t] = desired_spacing;
        tr.acceleration[t] = acceleration;

        // Vehicles do not reverse.
        let next_speed = (speed + acceleration * dt).max(0.0);
        // Uses the speed before the update.
        let next_position = tr.position[t] + speed * dt + 0.5 * acceleration * (dt * dt);

        let spacing = tr.leader_position[t + 1] - next_position;
        let next_gap = spacing - self.idm.leader_length;
        let delta_speed = next_speed - tr.leader_speed[t + 1];

        tr.speed[t + 1] = next_speed;
        tr.position[t + 1] = next_position;
        tr.spacing[t + 1] = spacing;
        tr.gap[t + 1] = next_gap;
        tr.delta_speed[t + 1] = delta_speed;

        self.index += 1;

        if self.is_finished() && self.degenerate_steps > 0 {
            warn!(
                "{} of {} steps ran with a gap below {MIN_GAP} m",
                self.degenerate_steps, self.index
            );
        }

        Step {
            index: t,
            desired_spacing,
            acceleration,
            speed: next_speed,
            position: next_position,
            spacing,
            gap: next_gap,
            delta_speed,
        }
    }
}

impl Iterator for Stepper {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.is_finished() {
            return None;
        }

        Some(self.advance())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Stepper {
    fn len(&self) -> usize {
        self.trajectory.len().saturating_sub(self.index + 1)
    }
}

impl FusedIterator for Stepper {}

/// Fills every follower sample of `trajectory` and returns it.
pub fn run(idm: Idm, trajectory: Trajectory) -> Result<Trajectory, Error> {
    Ok(Stepper::new(idm, trajectory)?.finish())
}
