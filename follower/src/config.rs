//! Deserializable description of a single follower run.
//!
//! An example in JSON (any serde format works):
//!
//! ```json
//! {
//!   "vehicle": 12,
//!   "parameters": { "resolution": 0.1, "s_0": 2, "Tg": 1.5, "a": 1, "b": 1.5,
//!                   "v_0": 30, "small_delta": 4, "ln1": 5 },
//!   "leader": { "Time": [0, 0.1, 0.2], "xn1": [30, 32, 34], "vn1": [20, 20, 20] },
//!   "follower": { "xn": 0, "vn": 20 }
//! }
//! ```
//!
//! Omitted parameters take [`Idm::default`] values. An omitted
//! `time_length` covers the whole leader trace, whose columns must then
//! all have the same length.

use serde::{Deserialize, Serialize};

use crate::{
    driver::{run, FollowerRun, FollowerState, FollowerTable, Idm, LeaderTrace, Trajectory},
    Error,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default, alias = "fvn")]
    pub vehicle: u32,
    #[serde(default)]
    pub time_length: Option<usize>,
    #[serde(default)]
    pub parameters: Idm,
    pub leader: LeaderTrace,
    pub follower: FollowerState,
}

impl ScenarioConfig {
    fn trajectory(&self) -> Result<Trajectory, Error> {
        match self.time_length {
            Some(time_length) => Trajectory::new(time_length, self.leader.clone(), self.follower),
            None => Trajectory::from_leader(self.leader.clone(), self.follower),
        }
    }

    /// Validates and runs the scenario to completion.
    pub fn simulate(&self) -> Result<FollowerTable, Error> {
        let trajectory = run(self.parameters, self.trajectory()?)?;
        Ok(FollowerTable::new(self.vehicle, &self.parameters, trajectory))
    }

    /// Validates the scenario and wraps it for stepping inside an ECS world.
    pub fn into_run(self) -> Result<FollowerRun, Error> {
        let trajectory = self.trajectory()?;
        FollowerRun::new(self.vehicle, self.parameters, trajectory)
    }
}
