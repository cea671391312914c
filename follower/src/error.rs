/// Errors raised while validating a run, before any step is taken.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("invalid trajectory: {0}")]
    InvalidTrajectory(#[from] TrajectoryError),
}

/// Why a trajectory buffer cannot be stepped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrajectoryError {
    #[error("time_length must be at least 1")]
    Empty,

    #[error("leader column `{column}` has {len} samples, expected at least {time_length}")]
    LeaderTooShort {
        column: &'static str,
        len: usize,
        time_length: usize,
    },

    #[error("leader columns differ in length: Time {time}, xn1 {position}, vn1 {speed}")]
    MismatchedLeaderColumns {
        time: usize,
        position: usize,
        speed: usize,
    },

    #[error("leader column `{column}` is not finite at index {index}")]
    NonFiniteLeader { column: &'static str, index: usize },

    #[error("initial follower {field} is not finite")]
    NonFiniteInitialState { field: &'static str },
}

impl Error {
    pub(crate) fn parameter(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}
