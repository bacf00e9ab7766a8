//! Package metadata handling and component manifest generation.

mod manifest;
mod metadata;

pub use manifest::describe_components;
pub use metadata::PackageMetadata;
