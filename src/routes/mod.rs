pub mod auth;

pub mod home;

pub mod courses;

pub mod students;

pub mod staff;

pub mod flashdecks;

pub mod frontend;

pub use auth::configure_auth_routes;
pub use courses::configure_course_routes;
pub use flashdecks::configure_flashdeck_routes;
pub use frontend::configure_frontend_routes;
pub use home::configure_home_routes;
pub use staff::configure_staff_routes;
pub use students::configure_student_routes;
