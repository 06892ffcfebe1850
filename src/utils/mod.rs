pub mod cookies;
pub mod extractor;
pub mod form;
pub mod jwt;
pub mod parameter_error_handler;
pub mod time;
pub mod validate;

pub use cookies::SessionCookies;
pub use extractor::{SafeCourseId, SafeDeckId, SafeStaffId, SafeStudentId};
pub use parameter_error_handler::{
    form_error_handler, json_error_handler, path_error_handler, query_error_handler,
};
