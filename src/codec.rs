//! Best-effort percent encoding and decoding.
//!
//! Filter and search text comes straight from user input, so the codec
//! must be total: malformed percent sequences are echoed back unchanged
//! instead of failing, and a missing value passes through as `None`.
//! Query translation therefore never fails on caller-supplied text.

use std::borrow::Cow;

/// Percent-encodes `text` for use as a URL query value.
pub fn encode(text: &str) -> Cow<'_, str> {
    urlencoding::encode(text)
}

/// Percent-decodes `text`, passing `None` through unchanged.
///
/// Input whose percent sequences decode to invalid UTF-8 (e.g. `"%FF"`)
/// is returned as-is rather than as an error.
pub fn decode(text: Option<&str>) -> Option<Cow<'_, str>> {
    let text = text?;
    Some(match urlencoding::decode(text) {
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(text),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_round_trips_plain_text() {
        assert_eq!(encode("hello world"), "hello%20world");
        assert_eq!(decode(Some("hello%20world")).unwrap(), "hello world");
    }

    #[test]
    fn decode_none_is_none() {
        assert_eq!(decode(None), None);
    }

    #[test]
    fn malformed_input_is_echoed_back() {
        assert_eq!(decode(Some("%FF")).unwrap(), "%FF");
    }
}
