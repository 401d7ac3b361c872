//! Post-generation schema compliance checks

pub mod validator;
pub mod violation;

pub use validator::check_npcs;
pub use violation::{ValidationReport, Violation};
