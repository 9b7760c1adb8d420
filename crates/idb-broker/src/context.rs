//! Brokered federation context.
//!
//! One context describes one login/link/registration attempt processed
//! through the identity broker. The broker reads its identity fields and
//! stages pre-phase attribute writes on it; the host framework owns it and
//! discards it when the attempt completes.

use std::collections::HashMap;

use uuid::Uuid;

use crate::config::SyncMode;

/// Context for a single federation attempt.
#[derive(Debug, Clone)]
pub struct BrokeredContext {
    /// Flow identifier, unique per attempt. Cache entries are keyed on it so
    /// nothing resolved here can leak into another attempt.
    pub flow_id: Uuid,

    /// Alias of the identity provider handling this attempt.
    pub provider_alias: String,

    /// The user's identifier at the identity provider.
    pub external_user_id: String,

    /// The username proposed for the local user model.
    pub username: String,

    /// Email asserted by the identity provider, if any.
    pub email: Option<String>,

    /// The identity provider's own sync mode, used when a mapper inherits.
    pub provider_sync_mode: SyncMode,

    /// Attribute writes staged before the local user record exists.
    pub(crate) staged_attributes: HashMap<String, Vec<String>>,
}

impl BrokeredContext {
    /// Creates a context for a new federation attempt.
    #[must_use]
    pub fn new(
        provider_alias: impl Into<String>,
        external_user_id: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            flow_id: Uuid::now_v7(),
            provider_alias: provider_alias.into(),
            external_user_id: external_user_id.into(),
            username: username.into(),
            email: None,
            provider_sync_mode: SyncMode::default(),
            staged_attributes: HashMap::new(),
        }
    }

    /// Sets the asserted email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the provider-level sync mode.
    #[must_use]
    pub const fn with_provider_sync_mode(mut self, mode: SyncMode) -> Self {
        self.provider_sync_mode = mode;
        self
    }

    /// Gets a staged attribute's values.
    #[must_use]
    pub fn staged_attribute(&self, name: &str) -> Option<&Vec<String>> {
        self.staged_attributes.get(name)
    }

    /// All attribute writes staged on this attempt.
    #[must_use]
    pub const fn staged_attributes(&self) -> &HashMap<String, Vec<String>> {
        &self.staged_attributes
    }
}
