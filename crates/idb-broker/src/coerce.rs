//! Payload coercion.
//!
//! The remote source returns loosely-typed JSON; the attribute store only
//! understands strings and string lists. Coercion normalizes an arbitrary
//! payload node into an [`AttributeValue`], or absent.
//!
//! The rules are order-sensitive: a one-element array collapses to a scalar
//! so single-valued attributes are not wrapped in a needless list.

use serde_json::Value;

use crate::value::AttributeValue;

/// Normalizes a payload node into an attribute value.
///
/// Shape rules:
/// - array with more than one element: ordered list of each element's text
/// - array with exactly one element: that element's text, trimmed
/// - empty array or explicit null: absent
/// - object: compact JSON serialization, as one opaque string
/// - number: integral decimal form (floats truncate toward zero)
/// - boolean: `"true"` / `"false"`
/// - string: trimmed text
#[must_use]
pub fn coerce(node: &Value) -> Option<AttributeValue> {
    match node {
        Value::Array(items) => match items.as_slice() {
            [] => None,
            [only] => Some(AttributeValue::Single(element_text(only).trim().to_string())),
            _ => Some(AttributeValue::Many(
                items.iter().map(element_text).collect(),
            )),
        },
        Value::Object(_) => Some(AttributeValue::Single(node.to_string())),
        Value::Number(number) => Some(AttributeValue::Single(integral_text(number))),
        Value::Bool(flag) => Some(AttributeValue::Single(flag.to_string())),
        Value::Null => None,
        Value::String(text) => Some(AttributeValue::Single(text.trim().to_string())),
    }
}

/// Text form of an array element: raw text for strings, JSON otherwise.
fn element_text(node: &Value) -> String {
    match node {
        Value::String(text) => text.clone(),
        Value::Number(number) => integral_text(number),
        other => other.to_string(),
    }
}

/// Decimal string form of a number, truncating fractional parts toward zero.
fn integral_text(number: &serde_json::Number) -> String {
    if let Some(value) = number.as_i64() {
        value.to_string()
    } else if let Some(value) = number.as_u64() {
        value.to_string()
    } else {
        // Finite by construction: serde_json rejects NaN/infinite literals.
        (number.as_f64().unwrap_or(0.0) as i64).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalar_text_is_trimmed() {
        assert_eq!(
            coerce(&json!("  Acme Corp  ")),
            Some(AttributeValue::single("Acme Corp"))
        );
    }

    #[test]
    fn single_element_array_collapses_to_scalar() {
        let scalar = coerce(&json!("Acme Corp"));
        let wrapped = coerce(&json!(["Acme Corp"]));
        assert_eq!(scalar, wrapped);
    }

    #[test]
    fn multi_element_array_preserves_order() {
        assert_eq!(
            coerce(&json!(["first", "second", "third"])),
            Some(AttributeValue::many(vec![
                "first".to_string(),
                "second".to_string(),
                "third".to_string(),
            ]))
        );
    }

    #[test]
    fn mixed_element_array_uses_text_forms() {
        assert_eq!(
            coerce(&json!(["a", 7, true])),
            Some(AttributeValue::many(vec![
                "a".to_string(),
                "7".to_string(),
                "true".to_string(),
            ]))
        );
    }

    #[test]
    fn empty_array_and_null_are_absent() {
        assert_eq!(coerce(&json!([])), None);
        assert_eq!(coerce(&Value::Null), None);
    }

    #[test]
    fn object_serializes_to_opaque_string() {
        let coerced = coerce(&json!({"name": "Acme", "tier": 1}));
        let Some(AttributeValue::Single(text)) = coerced else {
            panic!("expected a single value");
        };
        let round_trip: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(round_trip, json!({"name": "Acme", "tier": 1}));
    }

    #[test]
    fn numbers_render_as_integral_decimals() {
        assert_eq!(coerce(&json!(42)), Some(AttributeValue::single("42")));
        assert_eq!(coerce(&json!(-3)), Some(AttributeValue::single("-3")));
        assert_eq!(
            coerce(&json!(u64::MAX)),
            Some(AttributeValue::single(u64::MAX.to_string()))
        );
        // Floats truncate toward zero
        assert_eq!(coerce(&json!(3.9)), Some(AttributeValue::single("3")));
        assert_eq!(coerce(&json!(-3.9)), Some(AttributeValue::single("-3")));
    }

    #[test]
    fn booleans_render_as_text() {
        assert_eq!(coerce(&json!(true)), Some(AttributeValue::single("true")));
        assert_eq!(coerce(&json!(false)), Some(AttributeValue::single("false")));
    }

    #[test]
    fn blank_string_coerces_but_is_empty() {
        let coerced = coerce(&json!("   ")).unwrap();
        assert!(coerced.is_empty());
    }
}
