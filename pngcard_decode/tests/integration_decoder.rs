//! Integration tests for `CardDecoder`.
//!
//! Payloads are built the way embedding tools write them: a JSON card, base64
//! encoded, sometimes wrapped, unpadded, or followed by junk.

use std::collections::BTreeMap;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use pngcard_decode::{CardDecoder, DecodeFailure, DecoderOptions, TextEncoding};

fn encode(json: &str) -> String {
    STANDARD.encode(json.as_bytes())
}

#[test]
fn test_round_trip_nested_card() {
    let payload = encode(
        r#"{"spec":"chara_card_v2","data":{"name":"Alice","description":"A traveler",
        "personality":"curious","scenario":"a tavern","first_mes":"Hello!",
        "alternate_greetings":["Hey","Welcome back"],"tags":["fantasy","elf"]}}"#,
    );

    let decoder = CardDecoder::new();
    let card = decoder.decode(&payload, "/cards/alice.png");

    let Some(card) = card else {
        panic!("card should decode");
    };
    assert_eq!(card.name(), "Alice");
    assert_eq!(card.description(), "A traveler");
    assert_eq!(card.personality(), "curious");
    assert_eq!(card.scenario(), "a tavern");
    assert_eq!(card.first_greeting(), "Hello!");
    assert_eq!(card.alternate_greetings(), ["Hey", "Welcome back"]);
    assert_eq!(card.tags(), ["fantasy", "elf"]);
    assert_eq!(card.source_identity(), "/cards/alice.png");
    assert_eq!(card.greeting_count(), 3);
    assert_eq!(card.greeting(2), "Welcome back");
}

#[test]
fn test_unpadded_and_wrapped_payloads_decode() {
    let json = r#"{"name":"Bo"}"#;
    let unpadded = STANDARD_NO_PAD.encode(json);
    assert_ne!(unpadded.len() % 4, 0);

    let padded = encode(json);
    let wrapped = format!("  {}\r\n{}\n ", &padded[..8], &padded[8..]);

    let decoder = CardDecoder::new();
    for (i, payload) in [unpadded, padded, wrapped].iter().enumerate() {
        let card = decoder.decode(payload, &format!("card-{i}.png"));
        assert_eq!(card.map(|c| c.name().to_string()).as_deref(), Some("Bo"));
    }
}

#[test]
fn test_trailing_garbage_is_salvaged() {
    let payload = encode(r#"{"name":"Bob"}GARBAGE"#);
    let card = CardDecoder::new().decode(&payload, "bob.png");
    assert_eq!(card.map(|c| c.name().to_string()).as_deref(), Some("Bob"));
}

#[test]
fn test_top_level_fields_fill_gaps() {
    let payload = encode(
        r#"{"data":{"name":"Nested","description":""},"name":"Top","description":"From top","tags":["old"]}"#,
    );
    let Some(card) = CardDecoder::new().decode(&payload, "mixed.png") else {
        panic!("card should decode");
    };
    assert_eq!(card.name(), "Nested");
    assert_eq!(card.description(), "From top");
    assert_eq!(card.tags(), ["old"]);
}

#[test]
fn test_missing_fields_get_defaults() {
    let payload = encode(r#"{"tags":"solo","alternate_greetings":[1,"two"]}"#);
    let Some(card) = CardDecoder::new().decode(&payload, "bare.png") else {
        panic!("card should decode");
    };
    assert_eq!(card.name(), "Unknown");
    assert_eq!(card.first_greeting(), "");
    assert!(card.tags().is_empty());
    assert_eq!(card.alternate_greetings(), ["two"]);
    assert_eq!(card.greeting_count(), 2);
}

#[test]
fn test_cached_record_ignores_later_payload() {
    let decoder = CardDecoder::new();
    let first = decoder.decode(&encode(r#"{"name":"Alice"}"#), "alice.png");
    let second = decoder.decode("%%% not base64 %%%", "alice.png");

    match (first, second) {
        (Some(a), Some(b)) => assert!(Arc::ptr_eq(&a, &b)),
        other => panic!("both calls should return the cached card, got {other:?}"),
    }
    assert_eq!(decoder.cache_len(), 1);
}

#[test]
fn test_failures_are_cached_until_cleared() {
    let decoder = CardDecoder::new();
    assert_eq!(decoder.decode("%%%", "broken.png"), None);
    assert_eq!(decoder.cached("broken.png"), Some(None));

    // A valid payload for the same identity is not looked at.
    assert_eq!(decoder.decode(&encode(r#"{"name":"Fixed"}"#), "broken.png"), None);

    decoder.clear_cache();
    assert_eq!(decoder.cached("broken.png"), None);
    let card = decoder.decode(&encode(r#"{"name":"Fixed"}"#), "broken.png");
    assert_eq!(card.map(|c| c.name().to_string()).as_deref(), Some("Fixed"));
}

#[test]
fn test_bom_prefixed_text_decodes() {
    let mut bytes = b"\xEF\xBB\xBF".to_vec();
    bytes.extend_from_slice(br#"{"name":"Bom"}"#);
    let payload = STANDARD.encode(bytes);

    let card = CardDecoder::new().decode(&payload, "bom.png");
    assert_eq!(card.map(|c| c.name().to_string()).as_deref(), Some("Bom"));
}

#[test]
fn test_latin1_fallback_and_restricted_encodings() {
    let payload = STANDARD.encode(b"{\"name\":\"Ren\xE9\"}");

    let card = CardDecoder::new().decode(&payload, "latin.png");
    assert_eq!(card.map(|c| c.name().to_string()).as_deref(), Some("René"));

    let strict = CardDecoder::with_options(DecoderOptions {
        encodings: vec![TextEncoding::Utf8, TextEncoding::Utf8Bom],
    });
    assert!(matches!(
        strict.decode_document(&payload),
        Err(DecodeFailure::Encoding)
    ));
    assert_eq!(strict.decode(&payload, "latin.png"), None);
}

#[test]
fn test_non_object_payload_fails_at_shape_stage() {
    let decoder = CardDecoder::new();
    let result = decoder.decode_document(&encode(r#"["name","Alice"]"#));
    match result {
        Err(e @ DecodeFailure::NotAnObject("array")) => assert_eq!(e.stage(), "shape"),
        other => panic!("expected NotAnObject, got {other:?}"),
    }
    assert_eq!(decoder.decode(&encode("42"), "number.png"), None);
}

#[test]
fn test_unsalvageable_json_fails() {
    let decoder = CardDecoder::new();
    let result = decoder.decode_document(&encode(r#"{"name": "Alice""#));
    assert!(matches!(result, Err(DecodeFailure::Json(_))));

    let result = decoder.decode_document("%%%");
    assert!(matches!(result, Err(ref e) if e.stage() == "base64"));
}

#[test]
fn test_decode_all_keeps_every_identity() {
    let mut payloads = BTreeMap::new();
    payloads.insert("a.png".to_string(), encode(r#"{"name":"A"}"#));
    payloads.insert("b.png".to_string(), "???".to_string());

    let decoder = CardDecoder::new();
    let decoded = decoder.decode_all(&payloads);

    assert_eq!(decoded.len(), 2);
    assert_eq!(
        decoded
            .get("a.png")
            .and_then(Option::as_ref)
            .map(|c| c.name().to_string())
            .as_deref(),
        Some("A")
    );
    assert_eq!(decoded.get("b.png"), Some(&None));
    assert_eq!(decoder.cache_len(), 2);
}

#[test]
fn test_payload_split_by_spaces_and_tabs_decodes() {
    let encoded = encode(r#"{"name":"Spaced","tags":["a"]}"#);
    let (head, tail) = encoded.split_at(12);
    let payload = format!("{head} \t{tail}");

    let card = CardDecoder::new().decode(&payload, "spaced.png");
    assert_eq!(card.map(|c| c.name().to_string()).as_deref(), Some("Spaced"));
}
