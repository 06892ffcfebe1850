pub mod assignments;
pub mod common;
pub mod courses;
pub mod dashboard;
pub mod enrollments;
pub mod flashdecks;
pub mod profiles;
pub mod users;

pub use common::{ApiResponse, AppStartTime, ErrorCode};
