//! Realm domain model.
//!
//! A realm scopes users and carries the registration/login policy flags the
//! broker consults when deciding whether a federation attempt collides with
//! an already-registered account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A realm: an isolated space of users and login policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Realm {
    /// Unique identifier.
    pub id: Uuid,
    /// Unique realm name.
    pub name: String,
    /// Whether the realm is enabled.
    pub enabled: bool,

    // === Timestamps ===
    /// When the realm was created.
    pub created_at: DateTime<Utc>,
    /// When the realm was last updated.
    pub updated_at: DateTime<Utc>,

    // === Registration Settings ===
    /// Use email as username during registration.
    pub registration_email_as_username: bool,

    // === Login Settings ===
    /// Allow login with email address.
    pub login_with_email_allowed: bool,
    /// Allow duplicate email addresses.
    pub duplicate_emails_allowed: bool,
}

impl Realm {
    /// Creates a new realm with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            enabled: true,
            created_at: now,
            updated_at: now,
            registration_email_as_username: false,
            login_with_email_allowed: true,
            duplicate_emails_allowed: false,
        }
    }

    /// Sets whether registration uses the email as the username.
    #[must_use]
    pub const fn with_registration_email_as_username(mut self, value: bool) -> Self {
        self.registration_email_as_username = value;
        self
    }

    /// Sets whether duplicate email addresses are allowed.
    #[must_use]
    pub const fn with_duplicate_emails_allowed(mut self, value: bool) -> Self {
        self.duplicate_emails_allowed = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_realm_has_defaults() {
        let realm = Realm::new("acme");

        assert_eq!(realm.name, "acme");
        assert!(realm.enabled);
        assert!(!realm.registration_email_as_username);
        assert!(!realm.duplicate_emails_allowed);
        assert!(realm.login_with_email_allowed);
    }

    #[test]
    fn builder_flags() {
        let realm = Realm::new("acme")
            .with_registration_email_as_username(true)
            .with_duplicate_emails_allowed(true);

        assert!(realm.registration_email_as_username);
        assert!(realm.duplicate_emails_allowed);
    }
}
