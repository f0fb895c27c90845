use super::*;
use serde::Deserialize;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Order {
    id: u32,
    sku: String,
}

fn json(raw: &'static str) -> Payload {
    Payload::new(ENCODING_JSON, raw)
}

#[test]
fn test_encode_decode_struct() {
    let converter = JsonPayloadConverter;
    let order = Order {
        id: 7,
        sku: "A-1".to_string(),
    };
    let payload = encode(&converter, &order).unwrap();
    assert_eq!(payload.encoding(), Some(ENCODING_JSON));

    let decoded: Order = decode(&converter, &payload).unwrap();
    assert_eq!(decoded, order);
}

#[test]
fn test_null_uses_null_encoding() {
    let payload = encode(&JsonPayloadConverter, &Option::<u32>::None).unwrap();
    assert_eq!(payload.encoding(), Some(ENCODING_NULL));
    assert!(payload.data.is_empty());

    let decoded: Option<u32> = decode(&JsonPayloadConverter, &payload).unwrap();
    assert_eq!(decoded, None);
}

#[test]
fn test_decode_malformed_json() {
    let result: Result<u32, _> = decode(&JsonPayloadConverter, &json("{not json"));
    assert!(matches!(result, Err(DataConversionError::Decoding(_))));
}

#[test]
fn test_decode_wrong_shape() {
    let result: Result<u32, _> = decode(&JsonPayloadConverter, &json("\"text\""));
    assert!(matches!(result, Err(DataConversionError::Decoding(_))));
}

#[test]
fn test_decode_unsupported_encoding() {
    let payload = Payload::new("binary/protobuf", "x");
    let result: Result<u32, _> = decode(&JsonPayloadConverter, &payload);
    assert!(matches!(result, Err(DataConversionError::UnsupportedEncoding(e)) if e == "binary/protobuf"));
}

#[test]
fn test_decode_missing_encoding() {
    let result: Result<u32, _> = decode(&JsonPayloadConverter, &Payload::default());
    assert!(matches!(result, Err(DataConversionError::MissingEncoding)));
}

#[test]
fn test_decode_arguments_absent_is_unit() {
    decode_arguments::<()>(&JsonPayloadConverter, None).unwrap();

    let empty = Payloads::default();
    let none: Option<String> = decode_arguments(&JsonPayloadConverter, Some(&empty)).unwrap();
    assert_eq!(none, None);
}

#[test]
fn test_decode_arguments_single() {
    let payloads = Payloads::single(json("{\"x\":1}"));
    let value: serde_json::Value = decode_arguments(&JsonPayloadConverter, Some(&payloads)).unwrap();
    assert_eq!(value, serde_json::json!({"x": 1}));
}

#[test]
fn test_decode_arguments_multiple_as_tuple() {
    let payloads = Payloads::new(vec![json("\"sku-1\""), json("3")]);
    let (sku, qty): (String, u32) =
        decode_arguments(&JsonPayloadConverter, Some(&payloads)).unwrap();
    assert_eq!(sku, "sku-1");
    assert_eq!(qty, 3);
}

#[test]
fn test_encoded_values_get() {
    let values = EncodedValues::new(
        Some(Payloads::new(vec![json("\"a\""), json("2")])),
        Arc::new(JsonPayloadConverter),
    );
    assert_eq!(values.len(), 2);
    assert_eq!(values.get::<String>(0).unwrap(), "a");
    assert_eq!(values.get::<u32>(1).unwrap(), 2);
    assert!(matches!(
        values.get::<u32>(2),
        Err(DataConversionError::MissingArgument { index: 2, count: 2 })
    ));
}

#[test]
fn test_encoded_values_empty() {
    let values = EncodedValues::new(None, Arc::new(JsonPayloadConverter));
    assert!(values.is_empty());
    assert!(values.payloads().is_none());
    values.decode::<()>().unwrap();
}
