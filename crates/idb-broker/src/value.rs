//! Resolved attribute value shapes.
//!
//! The user-attribute store understands two value shapes: a single string or
//! an ordered list of strings. [`AttributeValue`] is that tagged pair;
//! [`ResolvedValue`] adds the explicit preserve marker the resolver applies
//! when an existing stored value must not be overwritten.

use serde::{Deserialize, Serialize};

/// A concrete attribute value: a single string or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A single-valued attribute.
    Single(String),
    /// A multi-valued attribute; order is preserved.
    Many(Vec<String>),
}

impl AttributeValue {
    /// Creates a single-valued attribute.
    #[must_use]
    pub fn single(value: impl Into<String>) -> Self {
        Self::Single(value.into())
    }

    /// Creates a multi-valued attribute.
    #[must_use]
    pub const fn many(values: Vec<String>) -> Self {
        Self::Many(values)
    }

    /// Converts a user's stored values into a resolvable value.
    ///
    /// An empty value list yields `None`: a user that carries no values for
    /// an attribute is indistinguishable from one that never had it.
    #[must_use]
    pub fn from_stored(values: &[String]) -> Option<Self> {
        if values.is_empty() {
            None
        } else {
            Some(Self::Many(values.to_vec()))
        }
    }

    /// Checks whether this value is meaningless for resolution purposes.
    ///
    /// A blank string and an empty list are both equivalent to absent: they
    /// are never cached and never overwrite a stored attribute.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(value) => value.trim().is_empty(),
            Self::Many(values) => values.is_empty(),
        }
    }

    /// Returns the value as an ordered list of strings, the shape the
    /// attribute store persists.
    #[must_use]
    pub fn into_values(self) -> Vec<String> {
        match self {
            Self::Single(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// The applier-facing outcome of a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedValue {
    /// Keep whatever is currently stored; never overwrite.
    Preserve,
    /// Write this concrete value.
    Value(AttributeValue),
}

impl ResolvedValue {
    /// Checks if this is the preserve marker.
    #[must_use]
    pub const fn is_preserve(&self) -> bool {
        matches!(self, Self::Preserve)
    }

    /// Returns the concrete value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&AttributeValue> {
        match self {
            Self::Preserve => None,
            Self::Value(value) => Some(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emptiness() {
        assert!(AttributeValue::single("").is_empty());
        assert!(AttributeValue::single("   ").is_empty());
        assert!(!AttributeValue::single("Acme").is_empty());
        assert!(AttributeValue::many(vec![]).is_empty());
        assert!(!AttributeValue::many(vec!["a".to_string()]).is_empty());
    }

    #[test]
    fn from_stored_skips_empty() {
        assert_eq!(AttributeValue::from_stored(&[]), None);
        assert_eq!(
            AttributeValue::from_stored(&["Acme".to_string()]),
            Some(AttributeValue::many(vec!["Acme".to_string()]))
        );
    }

    #[test]
    fn into_values_shapes() {
        assert_eq!(
            AttributeValue::single("Acme").into_values(),
            vec!["Acme".to_string()]
        );
        assert_eq!(
            AttributeValue::many(vec!["a".to_string(), "b".to_string()]).into_values(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn serde_shapes() {
        let single: AttributeValue = serde_json::from_str("\"Acme\"").unwrap();
        assert_eq!(single, AttributeValue::single("Acme"));

        let many: AttributeValue = serde_json::from_str("[\"a\",\"b\"]").unwrap();
        assert_eq!(
            many,
            AttributeValue::many(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn preserve_marker() {
        assert!(ResolvedValue::Preserve.is_preserve());
        assert_eq!(ResolvedValue::Preserve.value(), None);

        let resolved = ResolvedValue::Value(AttributeValue::single("Acme"));
        assert!(!resolved.is_preserve());
        assert_eq!(resolved.value(), Some(&AttributeValue::single("Acme")));
    }
}
