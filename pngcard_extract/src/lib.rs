#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

pub mod command_runner;
pub mod discover;
mod error;
pub mod exiftool;
pub mod extractor;
pub mod tool;

pub use error::ToolError;
pub use exiftool::ExifTool;
pub use extractor::{
    ExtractionResult, ExtractorOptions, FALLBACK_TAG, MetadataExtractor, PRIMARY_TAG, Progress,
};
pub use tool::{MetadataTool, TagEntry};
