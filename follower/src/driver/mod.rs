mod idm;
pub use idm::*;

mod trajectory;
pub use trajectory::*;

mod stepper;
pub use stepper::*;

mod table;
pub use table::*;

mod follower;
pub use follower::*;
