//! Intelligent Driver Model (IDM) for car-following behavior.
//!
//! Units:
//! - Distance: meters (m)
//! - Speed: meters per second (m/s)
//! - Acceleration: meters per second squared (m/s²)
//! - Time: seconds (s)

use serde::{Deserialize, Serialize};

use crate::Error;

/// Smallest bumper-to-bumper gap (m) the interaction term divides by.
pub const MIN_GAP: f64 = 0.01;

/// Intelligent Driver Model parameters, fixed for the duration of a run.
///
/// Typical real-world values:
/// - Time headway: 1.0-2.0 s (safe following distance in time)
/// - Min spacing: 2.0-5.0 m (bumper-to-bumper distance at standstill)
/// - Max acceleration: 1.0-3.0 m/s² (comfortable acceleration)
/// - Comfortable deceleration: 1.5-3.0 m/s² (comfortable braking)
///
/// Deserializes from either the descriptive field names or the short model
/// names (`s_0`, `Tg`, `a`, `b`, `v_0`, `small_delta`, `ln1`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Idm {
    /// Step size Δt (s).
    pub resolution: f64,
    #[serde(alias = "s_0")]
    pub min_spacing: f64,
    #[serde(alias = "Tg")]
    pub desired_time_headway: f64,
    #[serde(alias = "a")]
    pub max_acceleration: f64,
    #[serde(alias = "b")]
    pub comfortable_deceleration: f64,
    #[serde(alias = "v_0")]
    pub desired_speed: f64,
    #[serde(alias = "small_delta")]
    pub acceleration_exponent: f64,
    /// Converts center-to-center spacing into bumper-to-bumper gap.
    #[serde(alias = "ln1")]
    pub leader_length: f64,
}

impl Default for Idm {
    fn default() -> Self {
        Self {
            resolution: 0.1,
            min_spacing: 2.0,
            desired_time_headway: 1.5,
            max_acceleration: 1.0,
            comfortable_deceleration: 1.5,
            desired_speed: 30.0,
            acceleration_exponent: 4.0,
            leader_length: 5.0,
        }
    }
}

impl Idm {
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_desired_speed(mut self, desired_speed: f64) -> Self {
        self.desired_speed = desired_speed;
        self
    }

    pub fn with_leader_length(mut self, leader_length: f64) -> Self {
        self.leader_length = leader_length;
        self
    }

    /// Rejects parameter sets the recurrence cannot evaluate.
    pub fn validate(&self) -> Result<(), Error> {
        let fields = [
            ("resolution", self.resolution),
            ("s_0", self.min_spacing),
            ("Tg", self.desired_time_headway),
            ("a", self.max_acceleration),
            ("b", self.comfortable_deceleration),
            ("v_0", self.desired_speed),
            ("small_delta", self.acceleration_exponent),
            ("ln1", self.leader_length),
        ];

        for (name, value) in fields {
            if !value.is_finite() {
                return Err(Error::parameter(name, value, "must be finite"));
            }
        }

        let positive = [
            ("resolution", self.resolution),
            ("a", self.max_acceleration),
            ("b", self.comfortable_deceleration),
            ("v_0", self.desired_speed),
            ("small_delta", self.acceleration_exponent),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(Error::parameter(name, value, "must be > 0"));
            }
        }

        let non_negative = [
            ("s_0", self.min_spacing),
            ("Tg", self.desired_time_headway),
            ("ln1", self.leader_length),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(Error::parameter(name, value, "must be >= 0"));
            }
        }

        Ok(())
    }

    /// Desired spacing `s*` for the given speed and closing speed.
    ///
    /// Never drops below `min_spacing`, even when the follower is closing
    /// in fast. Returns `None` when the closing term is not a number.
    pub fn desired_spacing(&self, speed: f64, delta_speed: f64) -> Option<f64> {
        let closing = speed * self.desired_time_headway
            + (speed * delta_speed)
                / (2.0 * (self.max_acceleration * self.comfortable_deceleration).sqrt());

        if !closing.is_finite() {
            return None;
        }

        if closing < 0.0 {
            Some(self.min_spacing)
        } else {
            Some(self.min_spacing + closing)
        }
    }

    /// Acceleration on an empty road.
    pub fn free_road_acceleration(&self, speed: f64) -> f64 {
        self.max_acceleration
            * (1.0 - (speed / self.desired_speed).powf(self.acceleration_exponent))
    }

    /// IDM acceleration, floored at `-comfortable_deceleration`.
    ///
    /// Without a desired spacing only the free-road term applies. There is
    /// no upper clip.
    pub fn acceleration(&self, speed: f64, gap: f64, desired_spacing: Option<f64>) -> f64 {
        let raw = match desired_spacing {
            None => self.free_road_acceleration(speed),
            Some(s_star) => {
                let ratio = s_star / gap.max(MIN_GAP);
                self.max_acceleration
                    * (1.0
                        - (speed / self.desired_speed).powf(self.acceleration_exponent)
                        - ratio * ratio)
            }
        };

        raw.max(-self.comfortable_deceleration)
    }

    /// Steady-state bumper-to-bumper gap at which a follower driving at
    /// `speed` behind a leader at the same speed neither speeds up nor
    /// slows down. `None` at or above the desired speed.
    pub fn equilibrium_gap(&self, speed: f64) -> Option<f64> {
        let free = 1.0 - (speed / self.desired_speed).powf(self.acceleration_exponent);
        if free <= 0.0 {
            return None;
        }

        Some((self.min_spacing + speed * self.desired_time_headway) / free.sqrt())
    }
}
