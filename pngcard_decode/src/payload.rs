//! Base64 layer: clean up the raw tag text and turn it into bytes.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use crate::DecodeFailure;

/// Standard alphabet, canonical padding, tolerant of non-zero trailing bits.
const PADDED: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

/// Standard alphabet, padding optional. Used on the lenient retry.
const AS_IS: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Strip surrounding whitespace and any embedded line breaks. Tools sometimes
/// wrap long values.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.trim().chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}

/// Append `=` until the length is a multiple of four.
#[must_use]
pub fn pad(encoded: &str) -> String {
    let missing = (4 - encoded.len() % 4) % 4;
    let mut padded = String::with_capacity(encoded.len() + missing);
    padded.push_str(encoded);
    padded.extend(std::iter::repeat_n('=', missing));
    padded
}

/// Keep only standard-alphabet characters up to the first `=`. Whatever a
/// tool inserted into the value (spaces, tabs, stray punctuation) is dropped.
#[must_use]
pub fn lenient(raw: &str) -> String {
    raw.chars()
        .take_while(|&c| c != '=')
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/'))
        .collect()
}

/// Decode a payload: first the normalized, padding-corrected text, then the
/// lenient form of the raw text. The error of the first attempt is reported
/// when both fail.
pub fn decode_base64(raw: &str) -> Result<Vec<u8>, DecodeFailure> {
    let padded = pad(&normalize(raw));
    match PADDED.decode(&padded) {
        Ok(bytes) => Ok(bytes),
        Err(first) => {
            let cleaned = lenient(raw);
            if cleaned.is_empty() {
                return Err(DecodeFailure::InvalidBase64(first));
            }
            AS_IS
                .decode(&cleaned)
                .map_err(|_| DecodeFailure::InvalidBase64(first))
        }
    }
}
