use std::collections::BTreeMap;
use std::sync::Arc;

use pngcard_core::CardRecord;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::cache::{CachedCard, DecodeCache};
use crate::fields::CardDocument;
use crate::json::parse_with_salvage;
use crate::payload::decode_base64;
use crate::text::{TextEncoding, decode_text};
use crate::DecodeFailure;

/// Tunables for the decode pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Text encodings tried in order on the decoded bytes.
    pub encodings: Vec<TextEncoding>,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            encodings: TextEncoding::DEFAULT_ORDER.to_vec(),
        }
    }
}

/// Turns raw card payloads into [`CardRecord`]s, memoizing every outcome by
/// source identity.
///
/// A second call for an identity returns the first outcome, failures included,
/// without looking at the new payload.
#[derive(Debug, Clone, Default)]
pub struct CardDecoder {
    options: DecoderOptions,
    cache: Arc<DecodeCache>,
}

impl CardDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: DecoderOptions) -> Self {
        Self {
            options,
            cache: Arc::default(),
        }
    }

    /// Use an existing cache, e.g. one shared with another decoder.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<DecodeCache>) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub const fn options(&self) -> &DecoderOptions {
        &self.options
    }

    #[must_use]
    pub const fn cache(&self) -> &Arc<DecodeCache> {
        &self.cache
    }

    /// Decode `payload` for `identity`, or return the cached outcome.
    #[must_use]
    pub fn decode(&self, payload: &str, identity: &str) -> CachedCard {
        if let Some(cached) = self.cache.get(identity) {
            debug!(identity, "Decode cache hit");
            return cached;
        }

        let outcome = match self.decode_record(payload, identity) {
            Ok(record) => Some(Arc::new(record)),
            Err(e) => {
                warn!(identity, stage = e.stage(), error = %e, "Failed to decode card");
                None
            }
        };
        self.cache.insert_if_absent(identity, outcome)
    }

    /// Decode every entry of an extraction result.
    #[must_use]
    pub fn decode_all(&self, payloads: &BTreeMap<String, String>) -> BTreeMap<String, CachedCard> {
        payloads
            .iter()
            .map(|(identity, payload)| (identity.clone(), self.decode(payload, identity)))
            .collect()
    }

    /// Run the pipeline up to the JSON object, without touching the cache.
    pub fn decode_document(&self, payload: &str) -> Result<Map<String, Value>, DecodeFailure> {
        let bytes = decode_base64(payload)?;
        let (text, encoding) = decode_text(&bytes, &self.options.encodings)?;
        debug!(%encoding, len = text.len(), "Decoded payload text");

        match parse_with_salvage(&text)? {
            Value::Object(map) => Ok(map),
            other => Err(DecodeFailure::NotAnObject(type_name(&other))),
        }
    }

    fn decode_record(&self, payload: &str, identity: &str) -> Result<CardRecord, DecodeFailure> {
        let document = self.decode_document(payload)?;
        Ok(CardDocument::new(&document).to_record(identity))
    }

    /// Cached outcome for `identity`, if it has been decoded.
    #[must_use]
    pub fn cached(&self, identity: &str) -> Option<CachedCard> {
        self.cache.get(identity)
    }

    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
