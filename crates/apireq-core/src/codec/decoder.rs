use serde::de::DeserializeOwned;
use serde_json::error::Category;
use thiserror::Error;

/// Failure to decode a payload into the requested shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The bytes are not a well-formed document (syntax error, truncated input, empty body).
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// The document is well formed but does not match the requested shape.
    #[error("payload does not match the requested shape: {0}")]
    Shape(String),
}

crate::error_boundary!(serde_json::Error => DecodeError, |e| {
    match e.classify() {
        Category::Data => DecodeError::Shape(e.to_string()),
        Category::Syntax | Category::Eof | Category::Io => DecodeError::Malformed(e.to_string()),
    }
});

/// Capability that turns a byte payload into a typed value.
///
/// The executor is generic over this trait so a different wire format can be
/// plugged in without touching the request pipeline. All implementations must
/// be pure: decoding the same bytes twice yields the same outcome.
///
/// # Example
///
/// ```
/// use apireq_core::codec::{Decoder, JsonDecoder};
/// use serde::Deserialize;
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct Reading {
///     sensor: String,
///     value: f64,
/// }
///
/// let reading: Reading = JsonDecoder
///     .decode(br#"{"sensor":"t1","value":21.5}"#)
///     .unwrap();
/// assert_eq!(reading.sensor, "t1");
///
/// let err = JsonDecoder.decode::<Reading>(b"not json").unwrap_err();
/// assert!(err.to_string().starts_with("malformed payload"));
/// ```
pub trait Decoder: Send + Sync {
    /// Decode `bytes` into a value of type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the bytes are malformed or do not match `T`.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, DecodeError>;
}

/// JSON decoder backed by `serde_json`.
///
/// Unknown fields are ignored, following serde's defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, DecodeError> {
        let result = serde_json::from_slice(bytes).map_err(DecodeError::from);

        #[cfg(feature = "tracing")]
        if let Err(err) = &result {
            tracing::trace!(body_size = bytes.len(), error = %err, "JSON decode failed");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Account {
        id: u64,
        name: String,
        tags: Option<Vec<String>>,
    }

    #[test]
    fn test_decode_valid_payload() {
        let account: Account = JsonDecoder
            .decode(br#"{"id": 7, "name": "ops", "tags": ["a", "b"]}"#)
            .unwrap();

        assert_eq!(account.id, 7);
        assert_eq!(account.name, "ops");
        assert_eq!(account.tags.unwrap().len(), 2);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let account: Account = JsonDecoder
            .decode(br#"{"id": 1, "name": "x", "tags": null, "region": "eu"}"#)
            .unwrap();
        assert!(account.tags.is_none());
    }

    #[test]
    fn test_syntax_error_is_malformed() {
        let err = JsonDecoder
            .decode::<Account>(br#"{"id": 1, invalid}"#)
            .unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn test_empty_body_is_malformed() {
        let err = JsonDecoder.decode::<Account>(b"").unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn test_type_mismatch_is_shape_error() {
        let err = JsonDecoder
            .decode::<Account>(br#"{"id": "seven", "name": "ops"}"#)
            .unwrap_err();
        assert!(matches!(err, DecodeError::Shape(_)));
        assert!(err.to_string().contains("invalid type"));
    }

    #[test]
    fn test_missing_field_is_shape_error() {
        let err = JsonDecoder.decode::<Account>(br#"{"id": 1}"#).unwrap_err();
        match err {
            DecodeError::Shape(msg) => assert!(msg.contains("missing field")),
            other => panic!("Expected Shape variant, got {:?}", other),
        }
    }

    #[test]
    fn test_non_utf8_bytes_rejected() {
        let err = JsonDecoder
            .decode::<serde_json::Value>(&[0x7b, 0xff, 0xfe, 0x7d])
            .unwrap_err();
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    proptest! {
        #[test]
        fn prop_decoding_arbitrary_bytes_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let _ = JsonDecoder.decode::<serde_json::Value>(&bytes);
        }

        #[test]
        fn prop_integers_decode_to_themselves(n in any::<i64>()) {
            let decoded: i64 = JsonDecoder.decode(n.to_string().as_bytes()).unwrap();
            prop_assert_eq!(decoded, n);
        }
    }
}
