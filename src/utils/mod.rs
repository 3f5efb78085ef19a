pub mod manifest_patterns;
pub mod path_validator;
pub mod verbose;

pub use manifest_patterns::ManifestPatterns;
pub use path_validator::PathValidator;
