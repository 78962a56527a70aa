//! Text layer: pick the first encoding that accepts the decoded bytes.

use crate::DecodeFailure;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A candidate text encoding for decoded payload bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Strict UTF-8 without a byte order mark.
    Utf8,
    /// UTF-8 preceded by a byte order mark, which is stripped.
    Utf8Bom,
    /// One byte per character. Accepts any input.
    Latin1,
}

impl TextEncoding {
    /// The default order: strict UTF-8, BOM-prefixed UTF-8, Latin-1.
    pub const DEFAULT_ORDER: [Self; 3] = [Self::Utf8, Self::Utf8Bom, Self::Latin1];

    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            // A BOM is left for `Utf8Bom` so it never leaks into the JSON text.
            Self::Utf8 if bytes.starts_with(UTF8_BOM) => None,
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Self::Utf8Bom => bytes
                .strip_prefix(UTF8_BOM)
                .and_then(|rest| std::str::from_utf8(rest).ok())
                .map(str::to_owned),
            Self::Latin1 => Some(bytes.iter().copied().map(char::from).collect()),
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf8Bom => "utf-8-sig",
            Self::Latin1 => "latin-1",
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Try each encoding in order and return the first success.
pub fn decode_text(
    bytes: &[u8],
    encodings: &[TextEncoding],
) -> Result<(String, TextEncoding), DecodeFailure> {
    encodings
        .iter()
        .find_map(|&encoding| encoding.decode(bytes).map(|text| (text, encoding)))
        .ok_or(DecodeFailure::Encoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(bytes: &[u8], order: &[TextEncoding]) -> Option<(String, TextEncoding)> {
        decode_text(bytes, order).ok()
    }

    #[test]
    fn test_plain_utf8_wins() {
        let text = "{\"name\":\"Zoë\"}";
        assert_eq!(
            decoded(text.as_bytes(), &TextEncoding::DEFAULT_ORDER),
            Some((text.to_string(), TextEncoding::Utf8))
        );
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"{}");
        assert_eq!(
            decoded(&bytes, &TextEncoding::DEFAULT_ORDER),
            Some(("{}".to_string(), TextEncoding::Utf8Bom))
        );
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_latin1() {
        let bytes = b"{\"name\":\"Caf\xE9\"}";
        assert_eq!(
            decoded(bytes, &TextEncoding::DEFAULT_ORDER),
            Some(("{\"name\":\"Café\"}".to_string(), TextEncoding::Latin1))
        );
    }

    #[test]
    fn test_no_matching_encoding_fails() {
        let result = decode_text(b"\xFF\xFE", &[TextEncoding::Utf8, TextEncoding::Utf8Bom]);
        assert!(matches!(result, Err(DecodeFailure::Encoding)));
        assert!(matches!(decode_text(b"{}", &[]), Err(DecodeFailure::Encoding)));
    }
}
