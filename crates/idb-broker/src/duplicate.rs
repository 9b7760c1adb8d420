//! Duplicate-user detection.
//!
//! A first-time federation attempt may collide with an already-registered
//! local account: the surrounding identity system will then run its
//! account-linking flow instead of registering a new user. The detector
//! mirrors that system's own collision checks (email first when the realm
//! enforces unique emails, then the candidate username) so the resolver's
//! skip-fetch decision stays consistent with the linking behavior.

use std::fmt;

use idb_model::Realm;
use idb_storage::UserProvider;
use uuid::Uuid;

use crate::context::BrokeredContext;
use crate::error::BrokerResult;

/// Which user attribute matched an existing account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateAttribute {
    /// Matched on email.
    Email,
    /// Matched on username.
    Username,
}

impl DuplicateAttribute {
    /// Returns the attribute name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Username => "username",
        }
    }
}

impl fmt::Display for DuplicateAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An existing local account colliding with the current attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateMatch {
    /// Identifier of the matched user.
    pub user_id: Uuid,
    /// Which attribute matched.
    pub attribute: DuplicateAttribute,
    /// The matching value.
    pub value: String,
}

/// Looks for an already-registered user colliding with this attempt.
///
/// Checks, in order:
/// 1. the asserted email, when the realm disallows duplicate emails;
/// 2. the candidate username (the email when the realm registers
///    email-as-username, else the proposed username), when non-blank.
///
/// ## Errors
///
/// Propagates user-store lookup failures.
pub async fn find_duplicate(
    store: &dyn UserProvider,
    realm: &Realm,
    context: &BrokeredContext,
) -> BrokerResult<Option<DuplicateMatch>> {
    if let Some(email) = &context.email {
        if !realm.duplicate_emails_allowed {
            if let Some(existing) = store.get_by_email(realm.id, email).await? {
                return Ok(Some(DuplicateMatch {
                    user_id: existing.id,
                    attribute: DuplicateAttribute::Email,
                    value: existing.email.unwrap_or_else(|| email.clone()),
                }));
            }
        }
    }

    let candidate = if realm.registration_email_as_username {
        context.email.as_deref()
    } else {
        Some(context.username.as_str())
    };

    if let Some(username) = candidate.map(str::trim).filter(|name| !name.is_empty()) {
        if let Some(existing) = store.get_by_username(realm.id, username).await? {
            return Ok(Some(DuplicateMatch {
                user_id: existing.id,
                attribute: DuplicateAttribute::Username,
                value: existing.username,
            }));
        }
    }

    Ok(None)
}
