//! Field extraction across card spec generations.
//!
//! Newer cards nest their fields under `data`, older ones keep them at the top
//! level, and hand-edited files mix both. Each field is looked up under `data`
//! first and falls back to the top level when the nested value is missing,
//! null, or an empty string. Values of the wrong shape become the field's
//! default instead of failing the card.

use pngcard_core::CardRecord;
use serde_json::{Map, Value};

pub const NAME: &str = "name";
pub const DESCRIPTION: &str = "description";
pub const PERSONALITY: &str = "personality";
pub const SCENARIO: &str = "scenario";
pub const FIRST_GREETING: &str = "first_mes";
pub const ALTERNATE_GREETINGS: &str = "alternate_greetings";
pub const TAGS: &str = "tags";

const NESTED_KEY: &str = "data";

/// A parsed card object viewed through the two-tier lookup.
#[derive(Debug, Clone, Copy)]
pub struct CardDocument<'a> {
    root: &'a Map<String, Value>,
    nested: Option<&'a Map<String, Value>>,
}

impl<'a> CardDocument<'a> {
    /// A `data` member that is not an object is treated as absent.
    #[must_use]
    pub fn new(root: &'a Map<String, Value>) -> Self {
        Self {
            root,
            nested: root.get(NESTED_KEY).and_then(Value::as_object),
        }
    }

    /// Raw value of `field`, nested location first.
    #[must_use]
    pub fn lookup(&self, field: &str) -> Option<&'a Value> {
        self.nested
            .and_then(|nested| nested.get(field))
            .filter(|value| !is_blank(value))
            .or_else(|| self.root.get(field).filter(|value| !value.is_null()))
    }

    /// String field. Non-strings and empty strings read as `None`.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&'a str> {
        self.lookup(field)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
    }

    /// List-of-strings field. A non-list reads as empty; non-string elements
    /// are dropped.
    #[must_use]
    pub fn text_list(&self, field: &str) -> Vec<String> {
        self.lookup(field)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Build a record for `source_identity` from the recognized fields.
    #[must_use]
    pub fn to_record(&self, source_identity: &str) -> CardRecord {
        let text = |field: &str| self.text(field).unwrap_or_default();

        CardRecord::builder(source_identity)
            .name(text(NAME))
            .description(text(DESCRIPTION))
            .personality(text(PERSONALITY))
            .scenario(text(SCENARIO))
            .first_greeting(text(FIRST_GREETING))
            .alternate_greetings(self.text_list(ALTERNATE_GREETINGS))
            .tags(self.text_list(TAGS))
            .build()
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
