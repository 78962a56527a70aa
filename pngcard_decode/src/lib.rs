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

//! Tolerant decoding of embedded character card payloads.
//!
//! A payload goes through base64, text, JSON and field extraction in turn.
//! Each stage is an ordered list of strategies and reports a
//! [`DecodeFailure`] naming the stage that gave up.

mod cache;
mod decoder;
mod error;
pub mod fields;
pub mod json;
pub mod payload;
pub mod text;

pub use cache::{CachedCard, DecodeCache};
pub use decoder::{CardDecoder, DecoderOptions};
pub use error::DecodeFailure;
pub use fields::CardDocument;
pub use text::TextEncoding;
