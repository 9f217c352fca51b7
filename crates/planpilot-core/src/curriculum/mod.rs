//! Curriculum competencies: the built-in catalog, matching and uploads.

pub mod catalog;
pub mod matching;
pub mod upload;

pub use catalog::Catalog;
pub use matching::{auto_suggest, search, CompetencySuggestion};
pub use upload::{parse_curriculum_upload, UploadFormat};
