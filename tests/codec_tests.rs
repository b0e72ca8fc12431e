use items_provider::codec;
use pretty_assertions::assert_eq;

#[test]
fn decode_none_passes_through() {
    assert_eq!(codec::decode(None), None);
}

#[test]
fn decode_malformed_input_is_identity() {
    // %FF decodes to a byte sequence that is not valid UTF-8; the input
    // comes back unchanged instead of an error.
    assert_eq!(codec::decode(Some("%FF")).unwrap(), "%FF");
    assert_eq!(codec::decode(Some("%80%80")).unwrap(), "%80%80");
}

#[test]
fn decode_valid_input() {
    assert_eq!(codec::decode(Some("a%20b")).unwrap(), "a b");
    assert_eq!(codec::decode(Some("plain")).unwrap(), "plain");
}

#[test]
fn encode_is_total() {
    assert_eq!(codec::encode("hello world"), "hello%20world");
    assert_eq!(codec::encode(""), "");
    assert_eq!(codec::encode("100%"), "100%25");
}

#[test]
fn encode_decode_round_trip() {
    let text = "name=value&other=1/2?";
    let encoded = codec::encode(text);
    assert_eq!(codec::decode(Some(&encoded)).unwrap(), text);
}
