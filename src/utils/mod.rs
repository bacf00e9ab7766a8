//! Small shared utilities.

pub mod mime;
pub mod path;
pub mod version;
