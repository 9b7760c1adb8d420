//! Attribute write-back contract.
//!
//! The resolver decides; an [`AttributeApplier`] writes. Two targets exist
//! per attempt: the context's staged attributes (pre-phase, before the local
//! user record exists) and the user record itself (post-phase). Both consume
//! the same tagged value exhaustively; there is no runtime type inspection.

use idb_model::User;

use crate::context::BrokeredContext;
use crate::value::{AttributeValue, ResolvedValue};

/// Consumer of a resolved attribute value.
pub trait AttributeApplier {
    /// Applies a resolved value to the target.
    ///
    /// `Preserve` must leave any stored value untouched.
    fn apply_attribute(&mut self, attribute: &str, value: &ResolvedValue);
}

impl AttributeApplier for User {
    fn apply_attribute(&mut self, attribute: &str, value: &ResolvedValue) {
        match value {
            ResolvedValue::Preserve => {}
            ResolvedValue::Value(AttributeValue::Single(single)) => {
                self.set_attribute(attribute, vec![single.clone()]);
            }
            ResolvedValue::Value(AttributeValue::Many(values)) => {
                self.set_attribute(attribute, values.clone());
            }
        }
    }
}

impl AttributeApplier for BrokeredContext {
    fn apply_attribute(&mut self, attribute: &str, value: &ResolvedValue) {
        match value {
            ResolvedValue::Preserve => {}
            ResolvedValue::Value(AttributeValue::Single(single)) => {
                self.staged_attributes
                    .insert(attribute.to_string(), vec![single.clone()]);
            }
            ResolvedValue::Value(AttributeValue::Many(values)) => {
                self.staged_attributes
                    .insert(attribute.to_string(), values.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn user_applier_writes_values() {
        let realm_id = Uuid::now_v7();
        let mut user = User::new(realm_id, "jdoe");

        user.apply_attribute(
            "company",
            &ResolvedValue::Value(AttributeValue::single("Acme")),
        );
        assert_eq!(user.get_first_attribute("company"), Some("Acme"));

        user.apply_attribute(
            "groups",
            &ResolvedValue::Value(AttributeValue::many(vec![
                "dev".to_string(),
                "ops".to_string(),
            ])),
        );
        assert_eq!(
            user.get_attribute("groups"),
            Some(&vec!["dev".to_string(), "ops".to_string()])
        );
    }

    #[test]
    fn user_applier_preserve_is_a_no_op() {
        let realm_id = Uuid::now_v7();
        let mut user =
            User::new(realm_id, "jdoe").with_attribute("company", vec!["Acme".to_string()]);

        user.apply_attribute("company", &ResolvedValue::Preserve);
        assert_eq!(user.get_first_attribute("company"), Some("Acme"));
    }

    #[test]
    fn context_applier_stages_values() {
        let mut context = BrokeredContext::new("corporate-oidc", "ext-123", "jdoe");

        context.apply_attribute(
            "company",
            &ResolvedValue::Value(AttributeValue::single("Acme")),
        );
        assert_eq!(
            context.staged_attribute("company"),
            Some(&vec!["Acme".to_string()])
        );

        context.apply_attribute("company", &ResolvedValue::Preserve);
        assert_eq!(
            context.staged_attribute("company"),
            Some(&vec!["Acme".to_string()])
        );
    }
}
