use super::*;

#[test]
fn test_payload_encoding() {
    let payload = Payload::new(ENCODING_JSON, "{}");
    assert_eq!(payload.encoding(), Some(ENCODING_JSON));
    assert_eq!(payload.data, Bytes::from_static(b"{}"));
}

#[test]
fn test_payload_without_encoding() {
    let payload = Payload::default();
    assert_eq!(payload.encoding(), None);
}

#[test]
fn test_payload_invalid_utf8_encoding() {
    let mut payload = Payload::default();
    payload.metadata.insert(
        METADATA_ENCODING_KEY.to_string(),
        Bytes::from_static(&[0xff, 0xfe]),
    );
    assert_eq!(payload.encoding(), None);
}

#[test]
fn test_payloads_accessors() {
    let payloads = Payloads::new(vec![
        Payload::new(ENCODING_JSON, "1"),
        Payload::new(ENCODING_JSON, "2"),
    ]);
    assert_eq!(payloads.len(), 2);
    assert!(!payloads.is_empty());
    assert_eq!(payloads.get(1).map(|p| p.data.clone()), Some(Bytes::from_static(b"2")));
    assert!(payloads.get(2).is_none());
    assert_eq!(payloads.iter().count(), 2);
}

#[test]
fn test_payloads_from_single() {
    let payloads: Payloads = Payload::new(ENCODING_NULL, Bytes::new()).into();
    assert_eq!(payloads.len(), 1);
}

#[test]
fn test_header_insert_and_get() {
    let header = Header::empty().with("trace-id", Payload::new(ENCODING_JSON, "\"abc\""));
    assert!(!header.is_empty());
    assert!(header.get("trace-id").is_some());
    assert!(header.get("missing").is_none());
    assert_eq!(header.fields().len(), 1);
}
