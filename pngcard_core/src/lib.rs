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

//! Shared domain types for pngcard: the decoded character card record and the
//! collaborator seams (thumbnails) the rest of the workspace builds on.

pub mod record;
pub mod thumbnail;

pub use record::{CardRecord, CardRecordBuilder, UNKNOWN_NAME};
pub use thumbnail::{ThumbnailCache, ThumbnailProvider};
