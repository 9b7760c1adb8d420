//! User domain model.
//!
//! Users belong to a realm and carry profile fields, multi-valued custom
//! attributes, and links to the external identities they log in with.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A link between a local user and an identity at an external provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederatedIdentity {
    /// Identity provider alias (e.g., "corporate-oidc").
    pub provider_alias: String,
    /// The user's identifier at the provider.
    pub external_user_id: String,
    /// The user's username at the provider, if known.
    pub external_username: Option<String>,
}

impl FederatedIdentity {
    /// Creates a new federated identity link.
    #[must_use]
    pub fn new(provider_alias: impl Into<String>, external_user_id: impl Into<String>) -> Self {
        Self {
            provider_alias: provider_alias.into(),
            external_user_id: external_user_id.into(),
            external_username: None,
        }
    }

    /// Sets the username at the provider.
    #[must_use]
    pub fn with_external_username(mut self, username: impl Into<String>) -> Self {
        self.external_username = Some(username.into());
        self
    }
}

/// A local user record.
///
/// Attribute values are ordered lists of strings; single-valued attributes
/// are one-element lists. The broker never mutates a user directly; it goes
/// through the applier contract in the broker crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// Realm this user belongs to.
    pub realm_id: Uuid,
    /// Unique username within the realm.
    pub username: String,
    /// Whether the account is enabled.
    pub enabled: bool,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Whether the email has been verified.
    pub email_verified: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Custom attributes (multi-valued).
    pub attributes: HashMap<String, Vec<String>>,
    /// Linked external identities.
    pub federated_identities: Vec<FederatedIdentity>,
}

impl User {
    /// Creates a new user with the given username.
    #[must_use]
    pub fn new(realm_id: Uuid, username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            realm_id,
            username: username.into(),
            enabled: true,
            first_name: None,
            last_name: None,
            email: None,
            email_verified: false,
            created_at: now,
            updated_at: now,
            attributes: HashMap::new(),
            federated_identities: Vec::new(),
        }
    }

    /// Sets the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the first name.
    #[must_use]
    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    /// Sets the last name.
    #[must_use]
    pub fn with_last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    /// Sets a custom attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.attributes.insert(name.into(), values);
        self
    }

    /// Adds a federated identity link.
    #[must_use]
    pub fn with_federated_identity(mut self, identity: FederatedIdentity) -> Self {
        self.federated_identities.push(identity);
        self
    }

    /// Gets an attribute's values.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&Vec<String>> {
        self.attributes.get(name)
    }

    /// Gets the first value of an attribute.
    #[must_use]
    pub fn get_first_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Sets an attribute's values, replacing any existing values.
    pub fn set_attribute(&mut self, name: impl Into<String>, values: Vec<String>) {
        self.attributes.insert(name.into(), values);
        self.updated_at = Utc::now();
    }

    /// Removes an attribute, returning its previous values.
    pub fn remove_attribute(&mut self, name: &str) -> Option<Vec<String>> {
        let removed = self.attributes.remove(name);
        if removed.is_some() {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Finds a federated identity link by provider alias.
    #[must_use]
    pub fn get_federated_identity(&self, provider_alias: &str) -> Option<&FederatedIdentity> {
        self.federated_identities
            .iter()
            .find(|fi| fi.provider_alias == provider_alias)
    }

    /// Checks whether this user is linked to the given external identity.
    #[must_use]
    pub fn has_federated_identity(&self, provider_alias: &str, external_user_id: &str) -> bool {
        self.federated_identities
            .iter()
            .any(|fi| fi.provider_alias == provider_alias && fi.external_user_id == external_user_id)
    }
}
