//! Intelligent Driver Model follower behind a known leader trajectory.
//!
//! [`driver::run`] fills a [`driver::Trajectory`] in one call,
//! [`driver::Stepper`] yields the same steps one at a time, and
//! [`FollowerPlugin`] steps many independent runs inside a Bevy app.

use bevy_app::prelude::*;

mod config;
pub mod driver;
mod error;

pub use config::*;
pub use error::*;

use crate::driver::{advance_followers, StepBudget};

pub struct FollowerPlugin;

impl Plugin for FollowerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StepBudget>();

        app.add_systems(Update, advance_followers);
    }
}
