//! The decoded character card.
//!
//! A [`CardRecord`] is the normalized form of a card payload, whichever spec
//! generation produced it. Records are immutable once built: every field is
//! private and the only way in is [`CardRecordBuilder`], which applies the
//! defaulting rules so that `name` is never empty and both sequences always
//! exist.

use serde::Serialize;

/// Name given to cards that carry no usable name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// A validated character card decoded from PNG metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardRecord {
    name: String,
    description: String,
    personality: String,
    scenario: String,
    first_greeting: String,
    alternate_greetings: Vec<String>,
    tags: Vec<String>,
    source_identity: String,
}

impl CardRecord {
    #[must_use]
    pub fn builder(source_identity: impl Into<String>) -> CardRecordBuilder {
        CardRecordBuilder::new(source_identity)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn personality(&self) -> &str {
        &self.personality
    }

    #[must_use]
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    #[must_use]
    pub fn first_greeting(&self) -> &str {
        &self.first_greeting
    }

    #[must_use]
    pub fn alternate_greetings(&self) -> &[String] {
        &self.alternate_greetings
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Path or identifier of the file this card was decoded from.
    #[must_use]
    pub fn source_identity(&self) -> &str {
        &self.source_identity
    }

    /// Greeting by index: 0 is the first greeting, `1..=N` select alternate
    /// greetings. Anything out of range falls back to the first greeting.
    #[must_use]
    pub fn greeting(&self, index: usize) -> &str {
        index
            .checked_sub(1)
            .and_then(|alt| self.alternate_greetings.get(alt))
            .map_or(self.first_greeting.as_str(), String::as_str)
    }

    /// Number of selectable greetings, first greeting included.
    #[must_use]
    pub fn greeting_count(&self) -> usize {
        1 + self.alternate_greetings.len()
    }
}

/// Builder for [`CardRecord`]. The source identity is fixed at construction,
/// so every builder yields a record.
#[derive(Debug)]
pub struct CardRecordBuilder {
    name: Option<String>,
    description: String,
    personality: String,
    scenario: String,
    first_greeting: String,
    alternate_greetings: Vec<String>,
    tags: Vec<String>,
    source_identity: String,
}

impl CardRecordBuilder {
    #[must_use]
    pub fn new(source_identity: impl Into<String>) -> Self {
        Self {
            name: None,
            description: String::new(),
            personality: String::new(),
            scenario: String::new(),
            first_greeting: String::new(),
            alternate_greetings: Vec::new(),
            tags: Vec::new(),
            source_identity: source_identity.into(),
        }
    }

    /// Set the name. Empty names are replaced with [`UNKNOWN_NAME`] on build.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn personality(mut self, personality: impl Into<String>) -> Self {
        self.personality = personality.into();
        self
    }

    #[must_use]
    pub fn scenario(mut self, scenario: impl Into<String>) -> Self {
        self.scenario = scenario.into();
        self
    }

    #[must_use]
    pub fn first_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.first_greeting = greeting.into();
        self
    }

    #[must_use]
    pub fn alternate_greetings(mut self, greetings: Vec<String>) -> Self {
        self.alternate_greetings = greetings;
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Build the record, defaulting an empty or missing name.
    #[must_use]
    pub fn build(self) -> CardRecord {
        let name = self
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());

        CardRecord {
            name,
            description: self.description,
            personality: self.personality,
            scenario: self.scenario,
            first_greeting: self.first_greeting,
            alternate_greetings: self.alternate_greetings,
            tags: self.tags,
            source_identity: self.source_identity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CardRecord {
        CardRecord::builder("/cards/alice.png")
            .name("Alice")
            .first_greeting("Hello!")
            .alternate_greetings(vec!["Hi there.".to_string(), "Welcome back.".to_string()])
            .build()
    }

    #[test]
    fn test_greeting_zero_is_first_greeting() {
        assert_eq!(sample().greeting(0), "Hello!");
    }

    #[test]
    fn test_greeting_indexes_alternates() {
        let card = sample();
        assert_eq!(card.greeting(1), "Hi there.");
        assert_eq!(card.greeting(2), "Welcome back.");
    }

    #[test]
    fn test_greeting_out_of_range_falls_back() {
        let card = sample();
        assert_eq!(card.greeting(3), "Hello!");
        assert_eq!(card.greeting(usize::MAX), "Hello!");
    }

    #[test]
    fn test_greeting_count() {
        assert_eq!(sample().greeting_count(), 3);
    }

    #[test]
    fn test_empty_name_becomes_unknown() {
        let card = CardRecord::builder("a.png").name("").build();
        assert_eq!(card.name(), UNKNOWN_NAME);

        let card = CardRecord::builder("a.png").build();
        assert_eq!(card.name(), UNKNOWN_NAME);
        assert!(card.tags().is_empty());
        assert!(card.alternate_greetings().is_empty());
    }

    #[test]
    fn test_builder_keeps_source_identity() {
        let card = CardRecordBuilder::new("/cards/bob.png").name("Bob").build();
        assert_eq!(card.source_identity(), "/cards/bob.png");
        assert_eq!(card, CardRecord::builder("/cards/bob.png").name("Bob").build());
    }

    #[test]
    fn test_serializes_snake_case_fields() {
        #[expect(clippy::expect_used, reason = "test: record must serialize")]
        let json = serde_json::to_value(sample()).expect("record must serialize");
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["first_greeting"], "Hello!");
        assert_eq!(json["source_identity"], "/cards/alice.png");
        assert_eq!(json["tags"], serde_json::json!([]));
    }
}
