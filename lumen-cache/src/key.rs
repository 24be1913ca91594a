//! Deterministic cache-key construction and structural fingerprints.
//!
//! Both helpers canonicalize JSON by sorting object keys recursively, so two
//! logically identical inputs always produce the same string regardless of
//! key order.

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Build a cache key from a prefix and a parameter map.
///
/// Parameters are serialized after sorting keys, so
/// `cache_key("p", {b:1, a:2})` equals `cache_key("p", {a:2, b:1})`.
pub fn cache_key(prefix: &str, params: &Map<String, Value>) -> String {
    let mut keys: Vec<&String> = params.keys().collect();
    keys.sort();
    let parts: Vec<String> = keys
        .into_iter()
        .map(|k| format!("{}={}", k, canonicalize(&params[k])))
        .collect();
    format!("{}::{}", prefix, parts.join("&"))
}

/// Deterministic structural hash of any serializable value.
///
/// Used to key cache entries by content rather than by an externally
/// supplied id, so identical inputs reuse a cached result. The digest is
/// SHA-256 over the canonical (sorted-key) JSON rendering, hex-encoded.
pub fn data_fingerprint<T: Serialize>(data: &T) -> String {
    let value = serde_json::to_value(data).unwrap_or(Value::Null);
    let canonical = canonicalize(&value);
    let digest = Sha256::digest(canonical.as_bytes());
    hex::encode(digest)
}

/// Render a JSON value with all object keys sorted, recursively.
fn canonicalize(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let inner: Vec<String> = keys
                .into_iter()
                .map(|k| format!("{}:{}", Value::String(k.clone()), canonicalize(&map[k])))
                .collect();
            format!("{{{}}}", inner.join(","))
        }
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(canonicalize).collect();
            format!("[{}]", inner.join(","))
        }
        scalar => scalar.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_cache_key_is_key_order_independent() {
        let a = cache_key("p", &params(json!({"b": 1, "a": 2})));
        let b = cache_key("p", &params(json!({"a": 2, "b": 1})));
        assert_eq!(a, b);
    }

    #[test]
    fn test_cache_key_distinguishes_values() {
        let a = cache_key("p", &params(json!({"a": 1})));
        let b = cache_key("p", &params(json!({"a": 2})));
        assert_ne!(a, b);
    }

    #[test]
    fn test_cache_key_includes_prefix() {
        let key = cache_key("analytics", &params(json!({"subject": "s1"})));
        assert!(key.starts_with("analytics::"));
        assert!(key.contains("subject"));
    }

    #[test]
    fn test_fingerprint_nested_key_order_independent() {
        let a = data_fingerprint(&json!({"outer": {"x": 1, "y": [1, 2]}, "z": null}));
        let b = data_fingerprint(&json!({"z": null, "outer": {"y": [1, 2], "x": 1}}));
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_array_order_matters() {
        let a = data_fingerprint(&json!([1, 2, 3]));
        let b = data_fingerprint(&json!([3, 2, 1]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_is_hex_sha256() {
        let fp = data_fingerprint(&json!({"k": "v"}));
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fingerprint_of_derived_struct() {
        #[derive(Serialize)]
        struct Probe {
            name: String,
            count: u32,
        }
        let a = data_fingerprint(&Probe {
            name: "n".to_string(),
            count: 3,
        });
        let b = data_fingerprint(&json!({"count": 3, "name": "n"}));
        assert_eq!(a, b);
    }
}
