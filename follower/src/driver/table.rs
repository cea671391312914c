use serde::Serialize;

use crate::driver::{Idm, Trajectory};

/// Column-oriented result of a run, one row per time index.
///
/// Serializes with the conventional column names, in column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FollowerTable {
    #[serde(rename = "fvn")]
    pub vehicle: Vec<u32>,
    #[serde(rename = "Time")]
    pub time: Vec<f64>,
    #[serde(rename = "xn1")]
    pub leader_position: Vec<f64>,
    #[serde(rename = "vn1")]
    pub leader_speed: Vec<f64>,
    #[serde(rename = "ln1")]
    pub leader_length: Vec<f64>,
    #[serde(rename = "bn")]
    pub acceleration: Vec<f64>,
    #[serde(rename = "xn")]
    pub position: Vec<f64>,
    #[serde(rename = "vn")]
    pub speed: Vec<f64>,
    #[serde(rename = "sn")]
    pub spacing: Vec<f64>,
    #[serde(rename = "deltav")]
    pub delta_speed: Vec<f64>,
    #[serde(rename = "sn_star")]
    pub desired_spacing: Vec<Option<f64>>,
}

/// A single row of a [`FollowerTable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Row {
    #[serde(rename = "fvn")]
    pub vehicle: u32,
    #[serde(rename = "Time")]
    pub time: f64,
    #[serde(rename = "xn1")]
    pub leader_position: f64,
    #[serde(rename = "vn1")]
    pub leader_speed: f64,
    #[serde(rename = "ln1")]
    pub leader_length: f64,
    #[serde(rename = "bn")]
    pub acceleration: f64,
    #[serde(rename = "xn")]
    pub position: f64,
    #[serde(rename = "vn")]
    pub speed: f64,
    #[serde(rename = "sn")]
    pub spacing: f64,
    #[serde(rename = "deltav")]
    pub delta_speed: f64,
    #[serde(rename = "sn_star")]
    pub desired_spacing: Option<f64>,
}

impl FollowerTable {
    /// Packages a run. Scalars are repeated on every row.
    pub fn new(vehicle: u32, idm: &Idm, trajectory: Trajectory) -> Self {
        let len = trajectory.len();
        let Trajectory {
            time,
            leader_position,
            leader_speed,
            position,
            speed,
            spacing,
            desired_spacing,
            delta_speed,
            acceleration,
            ..
        } = trajectory;

        Self {
            vehicle: vec![vehicle; len],
            time,
            leader_position,
            leader_speed,
            leader_length: vec![idm.leader_length; len],
            acceleration,
            position,
            speed,
            spacing,
            delta_speed,
            desired_spacing,
        }
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<Row> {
        if index >= self.len() {
            return None;
        }

        Some(Row {
            vehicle: self.vehicle[index],
            time: self.time[index],
            leader_position: self.leader_position[index],
            leader_speed: self.leader_speed[index],
            leader_length: self.leader_length[index],
            acceleration: self.acceleration[index],
            position: self.position[index],
            speed: self.speed[index],
            spacing: self.spacing[index],
            delta_speed: self.delta_speed[index],
            desired_spacing: self.desired_spacing[index],
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        (0..self.len()).filter_map(|index| self.row(index))
    }
}
