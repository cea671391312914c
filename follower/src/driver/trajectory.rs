//! Owned per-run sample buffers.
//!
//! Units:
//! - Time: seconds (s)
//! - Position/Spacing/Gap: meters (m)
//! - Speed: meters per second (m/s)
//! - Acceleration: meters per second squared (m/s²)

use serde::{Deserialize, Serialize};

use crate::{Error, TrajectoryError};

/// Leader samples, fixed before the run starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderTrace {
    #[serde(alias = "Time")]
    pub time: Vec<f64>,
    #[serde(alias = "xn1")]
    pub position: Vec<f64>,
    #[serde(alias = "vn1")]
    pub speed: Vec<f64>,
}

impl LeaderTrace {
    pub fn new(time: Vec<f64>, position: Vec<f64>, speed: Vec<f64>) -> Self {
        Self {
            time,
            position,
            speed,
        }
    }

    /// A leader cruising at `speed` from `start`, sampled every `resolution` seconds.
    pub fn constant_speed(start: f64, speed: f64, resolution: f64, samples: usize) -> Self {
        let time: Vec<f64> = (0..samples).map(|i| i as f64 * resolution).collect();
        let position = time.iter().map(|t| start + speed * t).collect();

        Self {
            time,
            position,
            speed: vec![speed; samples],
        }
    }
}

/// Follower position and speed at index 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowerState {
    #[serde(alias = "xn")]
    pub position: f64,
    #[serde(alias = "vn")]
    pub speed: f64,
}

impl FollowerState {
    pub fn new(position: f64, speed: f64) -> Self {
        Self { position, speed }
    }
}

/// Leader and follower samples for one run, all of length `time_length`.
///
/// Follower entries past index 0 start zeroed and are written in index order
/// by a [`Stepper`](super::Stepper). The last index never receives an
/// acceleration or desired spacing.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub(crate) time: Vec<f64>,
    pub(crate) leader_position: Vec<f64>,
    pub(crate) leader_speed: Vec<f64>,
    pub(crate) position: Vec<f64>,
    pub(crate) speed: Vec<f64>,
    pub(crate) spacing: Vec<f64>,
    pub(crate) gap: Vec<f64>,
    pub(crate) desired_spacing: Vec<Option<f64>>,
    pub(crate) delta_speed: Vec<f64>,
    pub(crate) acceleration: Vec<f64>,
}

impl Trajectory {
    /// Allocates a run of `time_length` samples.
    ///
    /// Leader columns longer than `time_length` are truncated. Shorter ones,
    /// non-finite leader samples and a non-finite initial state are rejected.
    pub fn new(
        time_length: usize,
        leader: LeaderTrace,
        initial: FollowerState,
    ) -> Result<Self, Error> {
        if time_length == 0 {
            return Err(TrajectoryError::Empty.into());
        }

        let LeaderTrace {
            mut time,
            mut position,
            mut speed,
        } = leader;

        for (column, values) in [
            ("Time", &mut time),
            ("xn1", &mut position),
            ("vn1", &mut speed),
        ] {
            if values.len() < time_length {
                return Err(TrajectoryError::LeaderTooShort {
                    column,
                    len: values.len(),
                    time_length,
                }
                .into());
            }
            values.truncate(time_length);
        }

        for (column, values) in [("xn1", &position), ("vn1", &speed)] {
            if let Some(index) = values.iter().position(|v| !v.is_finite()) {
                return Err(TrajectoryError::NonFiniteLeader { column, index }.into());
            }
        }

        if !initial.position.is_finite() {
            return Err(TrajectoryError::NonFiniteInitialState { field: "xn" }.into());
        }
        if !initial.speed.is_finite() {
            return Err(TrajectoryError::NonFiniteInitialState { field: "vn" }.into());
        }

        let mut follower_position = vec![0.0; time_length];
        let mut follower_speed = vec![0.0; time_length];
        follower_position[0] = initial.position;
        follower_speed[0] = initial.speed;

        Ok(Self {
            time,
            leader_position: position,
            leader_speed: speed,
            position: follower_position,
            speed: follower_speed,
            spacing: vec![0.0; time_length],
            gap: vec![0.0; time_length],
            desired_spacing: vec![None; time_length],
            delta_speed: vec![0.0; time_length],
            acceleration: vec![0.0; time_length],
        })
    }

    /// Allocates a run covering the whole leader trace.
    ///
    /// All three leader columns must have the same length.
    pub fn from_leader(leader: LeaderTrace, initial: FollowerState) -> Result<Self, Error> {
        let (time, position, speed) = (
            leader.time.len(),
            leader.position.len(),
            leader.speed.len(),
        );
        if time != position || time != speed {
            return Err(TrajectoryError::MismatchedLeaderColumns {
                time,
                position,
                speed,
            }
            .into());
        }

        Self::new(time, leader, initial)
    }

    /// Derives spacing, gap and closing speed at index 0.
    pub(crate) fn prime(&mut self, leader_length: f64) {
        self.spacing[0] = self.leader_position[0] - self.position[0];
        self.gap[0] = self.spacing[0] - leader_length;
        self.delta_speed[0] = self.speed[0] - self.leader_speed[0];
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn leader_position(&self) -> &[f64] {
        &self.leader_position
    }

    pub fn leader_speed(&self) -> &[f64] {
        &self.leader_speed
    }

    pub fn position(&self) -> &[f64] {
        &self.position
    }

    pub fn speed(&self) -> &[f64] {
        &self.speed
    }

    /// Center-to-center spacing `xn1 - xn`.
    pub fn spacing(&self) -> &[f64] {
        &self.spacing
    }

    /// Bumper-to-bumper gap `spacing - ln1`.
    pub fn gap(&self) -> &[f64] {
        &self.gap
    }

    pub fn desired_spacing(&self) -> &[Option<f64>] {
        &self.desired_spacing
    }

    /// Closing speed `vn - vn1`, positive while approaching the leader.
    pub fn delta_speed(&self) -> &[f64] {
        &self.delta_speed
    }

    pub fn acceleration(&self) -> &[f64] {
        &self.acceleration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leader(samples: usize) -> LeaderTrace {
        LeaderTrace::constant_speed(30.0, 20.0, 0.1, samples)
    }

    #[test]
    fn allocates_zeroed_follower_columns() {
        let trajectory = Trajectory::new(4, leader(4), FollowerState::new(1.0, 20.0)).unwrap();

        assert_eq!(trajectory.len(), 4);
        assert_eq!(trajectory.position(), &[1.0, 0.0, 0.0, 0.0]);
        assert_eq!(trajectory.speed(), &[20.0, 0.0, 0.0, 0.0]);
        assert_eq!(trajectory.acceleration(), &[0.0; 4]);
        assert!(trajectory.desired_spacing().iter().all(Option::is_none));
    }

    #[test]
    fn truncates_long_leader() {
        let trajectory = Trajectory::new(3, leader(10), FollowerState::default()).unwrap();

        assert_eq!(trajectory.len(), 3);
        assert_eq!(trajectory.leader_position().len(), 3);
        assert_eq!(trajectory.leader_speed().len(), 3);
    }

    #[test]
    fn rejects_short_leader() {
        let mut trace = leader(5);
        trace.speed.truncate(3);

        assert_eq!(
            Trajectory::new(5, trace, FollowerState::default()),
            Err(Error::InvalidTrajectory(TrajectoryError::LeaderTooShort {
                column: "vn1",
                len: 3,
                time_length: 5,
            }))
        );
    }

    #[test]
    fn rejects_empty_run() {
        assert_eq!(
            Trajectory::new(0, leader(3), FollowerState::default()),
            Err(Error::InvalidTrajectory(TrajectoryError::Empty))
        );
        assert_eq!(
            Trajectory::from_leader(LeaderTrace::default(), FollowerState::default()),
            Err(Error::InvalidTrajectory(TrajectoryError::Empty))
        );
    }

    #[test]
    fn rejects_non_finite_leader_samples() {
        let mut trace = leader(5);
        trace.position[2] = f64::INFINITY;

        assert_eq!(
            Trajectory::new(5, trace, FollowerState::default()),
            Err(Error::InvalidTrajectory(TrajectoryError::NonFiniteLeader {
                column: "xn1",
                index: 2,
            }))
        );
    }

    #[test]
    fn ignores_non_finite_leader_samples_past_the_run() {
        let mut trace = leader(5);
        trace.speed[4] = f64::NAN;

        assert!(Trajectory::new(4, trace, FollowerState::default()).is_ok());
    }

    #[test]
    fn rejects_non_finite_initial_state() {
        assert_eq!(
            Trajectory::new(3, leader(3), FollowerState::new(0.0, f64::NAN)),
            Err(Error::InvalidTrajectory(
                TrajectoryError::NonFiniteInitialState { field: "vn" }
            ))
        );
    }

    #[test]
    fn from_leader_rejects_unequal_columns() {
        let mut trace = leader(5);
        trace.position.truncate(2);

        assert_eq!(
            Trajectory::from_leader(trace, FollowerState::default()),
            Err(Error::InvalidTrajectory(
                TrajectoryError::MismatchedLeaderColumns {
                    time: 5,
                    position: 2,
                    speed: 5,
                }
            ))
        );
    }

    #[test]
    fn explicit_length_may_truncate_unequal_columns() {
        let mut trace = leader(5);
        trace.position.truncate(3);

        let trajectory = Trajectory::new(2, trace, FollowerState::default()).unwrap();
        assert_eq!(trajectory.len(), 2);
    }

    #[test]
    fn priming_derives_index_zero() {
        let mut trajectory =
            Trajectory::new(3, leader(3), FollowerState::new(0.0, 22.0)).unwrap();
        trajectory.prime(5.0);

        assert_eq!(trajectory.spacing()[0], 30.0);
        assert_eq!(trajectory.gap()[0], 25.0);
        assert_eq!(trajectory.delta_speed()[0], 2.0);
    }
}
