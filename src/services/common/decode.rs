//! Decoders from D-Bus variants into plain Rust values.
//!
//! Both oFono and ConnMan hand out `a{sv}` property bags. A value of the
//! wrong type decodes to `None`, which the property records treat as
//! "not reported" rather than as a reset.

use std::collections::HashMap;

use zbus::zvariant::Value;

/// Strips any number of variant wrappers.
fn unwrap_variant<'a, 'v>(value: &'a Value<'v>) -> &'a Value<'v> {
    match value {
        Value::Value(inner) => unwrap_variant(inner),
        other => other,
    }
}

/// Decodes a `b` value.
pub fn boolean(value: &Value<'_>) -> Option<bool> {
    match unwrap_variant(value) {
        Value::Bool(flag) => Some(*flag),
        _ => None,
    }
}

/// Decodes an `s` or `o` value.
pub fn string(value: &Value<'_>) -> Option<String> {
    match unwrap_variant(value) {
        Value::Str(text) => Some(text.to_string()),
        Value::ObjectPath(path) => Some(path.to_string()),
        _ => None,
    }
}

/// Decodes an `as` value. Non-string elements are skipped.
pub fn string_list(value: &Value<'_>) -> Option<Vec<String>> {
    match unwrap_variant(value) {
        Value::Array(array) => Some(array.iter().filter_map(string).collect()),
        _ => None,
    }
}

/// Decodes an `a{sy}` value.
pub fn byte_map(value: &Value<'_>) -> Option<HashMap<String, u8>> {
    let owned = unwrap_variant(value).try_clone().ok()?;
    HashMap::<String, u8>::try_from(owned).ok()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn decodes_matching_types() {
        assert_eq!(boolean(&Value::from(true)), Some(true));
        assert_eq!(string(&Value::from("lte")), Some("lte".to_string()));
        assert_eq!(
            string_list(&Value::from(vec!["org.ofono.SimManager", "org.ofono.Modem"])),
            Some(vec![
                "org.ofono.SimManager".to_string(),
                "org.ofono.Modem".to_string()
            ])
        );
    }

    #[test]
    fn mismatched_types_are_not_reported() {
        assert_eq!(boolean(&Value::from("true")), None);
        assert_eq!(string(&Value::from(3u8)), None);
        assert_eq!(string_list(&Value::from(false)), None);
    }

    #[test]
    fn looks_through_variant_wrappers() {
        let wrapped = Value::Value(Box::new(Value::from(true)));
        assert_eq!(boolean(&wrapped), Some(true));
    }

    #[test]
    fn decodes_retry_counters() {
        let mut retries = HashMap::new();
        retries.insert("pin".to_string(), 3u8);
        retries.insert("puk".to_string(), 10u8);

        let decoded = byte_map(&Value::from(retries.clone())).unwrap();
        assert_eq!(decoded, retries);
    }
}
