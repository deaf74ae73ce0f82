//! Business logic layer.

mod access_control;
mod user_lifecycle;

pub use access_control::AccessControl;
pub use user_lifecycle::{UserLifecycle, UserManager};
