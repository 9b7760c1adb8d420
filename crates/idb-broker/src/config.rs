//! Mapper configuration.
//!
//! A mapper configuration names the target user attribute and selects a
//! synchronization mode. The mode may be the literal `INHERIT`, deferring to
//! the identity provider's own mode, and is resolved into a concrete mode
//! once per invocation.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{BrokerError, BrokerResult};

/// Config key for the target user attribute name.
pub const CONF_ATTRIBUTE_NAME: &str = "attribute.name";

/// Config key for the sync-mode selector.
pub const CONF_SYNC_MODE: &str = "syncMode";

/// The literal selecting the provider-level sync mode.
const SYNC_MODE_INHERIT: &str = "INHERIT";

/// Identity-provider synchronization mode.
///
/// Governs whether an attribute is refreshed, imported once, or left
/// untouched on repeat logins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncMode {
    /// Populate on first creation only; never overwrite afterwards.
    #[default]
    Import,

    /// Pre-force behavior: refresh unless an existing value is found.
    Legacy,

    /// Always refresh from the external source.
    Force,
}

impl SyncMode {
    /// Returns the config literal for this mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Import => "IMPORT",
            Self::Legacy => "LEGACY",
            Self::Force => "FORCE",
        }
    }

    /// Checks if this mode always refreshes.
    #[must_use]
    pub const fn is_force(&self) -> bool {
        matches!(self, Self::Force)
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncMode {
    type Err = BrokerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IMPORT" => Ok(Self::Import),
            "LEGACY" => Ok(Self::Legacy),
            "FORCE" => Ok(Self::Force),
            other => Err(BrokerError::config(format!(
                "unknown sync mode '{other}'"
            ))),
        }
    }
}

/// Configuration for an identity-provider mapper instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Mapper ID.
    pub id: Uuid,

    /// Mapper name.
    pub name: String,

    /// Mapper type identifier.
    pub mapper_type: String,

    /// Alias of the identity provider this mapper belongs to.
    pub provider_alias: String,

    /// Mapper-specific configuration.
    pub config: HashMap<String, String>,
}

impl MapperConfig {
    /// Creates a new mapper config.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        mapper_type: impl Into<String>,
        provider_alias: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            mapper_type: mapper_type.into(),
            provider_alias: provider_alias.into(),
            config: HashMap::new(),
        }
    }

    /// Adds a config value.
    #[must_use]
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Gets a config value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    /// Gets the configured target attribute name, trimmed.
    ///
    /// Returns `None` when the name is unset or blank, which disables the
    /// mapper for the flow.
    #[must_use]
    pub fn user_attribute(&self) -> Option<String> {
        self.get(CONF_ATTRIBUTE_NAME)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToOwned::to_owned)
    }

    /// Resolves the configured sync mode into a concrete mode.
    ///
    /// A missing selector or the literal `INHERIT` defers to the
    /// provider-level mode.
    ///
    /// ## Errors
    ///
    /// Returns `BrokerError::Configuration` for an unknown mode literal.
    pub fn sync_mode(&self, provider_default: SyncMode) -> BrokerResult<SyncMode> {
        match self.get(CONF_SYNC_MODE).map(str::trim) {
            None | Some("") | Some(SYNC_MODE_INHERIT) => Ok(provider_default),
            Some(literal) => literal.parse(),
        }
    }
}
