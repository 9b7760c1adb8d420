//! Remote attribute mapper.
//!
//! The decision engine behind attribute enrichment. The host invokes the
//! mapper twice per federation attempt: once before user creation/matching
//! ([`RemoteAttributeMapper::preprocess_federated_identity`]) and once after
//! the user record is finalized
//! ([`RemoteAttributeMapper::update_brokered_user`]). Both run the same
//! resolution rules over a shared [`AttemptCache`], so one attempt performs
//! at most one remote fetch and both phases write the same value.
//!
//! Resolution is best-effort: a failure here must never fail the federation
//! attempt, so both entry points catch every error, log it with flow
//! context, and report it as [`Resolution::Failed`].

use idb_model::{Realm, User};
use idb_storage::UserProvider;

use crate::applier::AttributeApplier;
use crate::cache::AttemptCache;
use crate::config::{MapperConfig, SyncMode};
use crate::context::BrokeredContext;
use crate::duplicate::find_duplicate;
use crate::error::{BrokerError, BrokerResult};
use crate::remote::RemoteSource;
use crate::value::{AttributeValue, ResolvedValue};

/// Identifier for this mapper implementation.
pub const MAPPER_TYPE: &str = "remote-attribute-importer";

// ============================================================================
// Resolution Outcome
// ============================================================================

/// Why a resolution ended without a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The target attribute name is unset or blank.
    MissingAttributeName,
    /// The remote source produced no value, an empty string, or an empty
    /// list.
    NoRemoteValue,
}

/// Outcome of one resolver invocation.
#[derive(Debug)]
pub enum Resolution {
    /// A value was resolved and handed to the applier (the preserve marker
    /// included).
    Applied {
        /// Target attribute name.
        attribute: String,
        /// The applied value.
        value: ResolvedValue,
    },

    /// Nothing to do for this attribute; the applier was not invoked.
    Skipped(SkipReason),

    /// Resolution failed; logged, and the federation attempt continues.
    Failed {
        /// The underlying error.
        cause: BrokerError,
    },
}

impl Resolution {
    /// Checks if a value (or the preserve marker) was applied.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Checks if the invocation was a no-op.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// Checks if resolution failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Returns the applied value, if any.
    #[must_use]
    pub const fn applied_value(&self) -> Option<&ResolvedValue> {
        match self {
            Self::Applied { value, .. } => Some(value),
            _ => None,
        }
    }
}

// ============================================================================
// Mapper
// ============================================================================

/// Identity-provider mapper enriching a user attribute from a remote source.
pub struct RemoteAttributeMapper<S> {
    source: S,
}

impl<S: RemoteSource> RemoteAttributeMapper<S> {
    /// Creates a mapper over the given remote source.
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Returns the remote source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Pre-phase: runs before the local user is created or matched.
    ///
    /// Resolves the attribute, stages the outcome on the context, and seeds
    /// the attempt cache so the post-phase reuses it without a second fetch.
    pub async fn preprocess_federated_identity(
        &self,
        store: &dyn UserProvider,
        realm: &Realm,
        mapper: &MapperConfig,
        context: &mut BrokeredContext,
        cache: &mut AttemptCache,
    ) -> Resolution {
        tracing::debug!(
            flow = %context.flow_id,
            user = %context.username,
            "preprocessing federated identity"
        );

        match self.try_preprocess(store, realm, mapper, context, cache).await {
            Ok(resolution) => resolution,
            Err(cause) => {
                tracing::error!(
                    flow = %context.flow_id,
                    error = %cause,
                    "attribute resolution failed, continuing federation attempt"
                );
                Resolution::Failed { cause }
            }
        }
    }

    /// Post-phase: runs once the user record is finalized.
    ///
    /// Reapplies the pre-phase outcome from the attempt cache, or resolves
    /// from scratch when the pre-phase produced nothing.
    pub async fn update_brokered_user(
        &self,
        store: &dyn UserProvider,
        realm: &Realm,
        mapper: &MapperConfig,
        context: &BrokeredContext,
        cache: &mut AttemptCache,
        user: &mut User,
    ) -> Resolution {
        tracing::debug!(
            flow = %context.flow_id,
            user = %user.username,
            "updating brokered user"
        );

        match self
            .try_update(store, realm, mapper, context, cache, user)
            .await
        {
            Ok(resolution) => resolution,
            Err(cause) => {
                tracing::error!(
                    flow = %context.flow_id,
                    error = %cause,
                    "attribute resolution failed, continuing federation attempt"
                );
                Resolution::Failed { cause }
            }
        }
    }

    async fn try_preprocess(
        &self,
        store: &dyn UserProvider,
        realm: &Realm,
        mapper: &MapperConfig,
        context: &mut BrokeredContext,
        cache: &mut AttemptCache,
    ) -> BrokerResult<Resolution> {
        let Some(attribute) = mapper.user_attribute() else {
            tracing::warn!(
                flow = %context.flow_id,
                "user attribute name is not configured, skipping mapper"
            );
            return Ok(Resolution::Skipped(SkipReason::MissingAttributeName));
        };
        let sync_mode = mapper.sync_mode(context.provider_sync_mode)?;

        let federated_user = store
            .get_by_federated_identity(realm.id, &context.provider_alias, &context.external_user_id)
            .await?;

        // An already-linked user keeps its current value for every mode but
        // FORCE: seed the cache so rule 1 applies it in both phases. An
        // empty stored value seeds nothing.
        if let Some(user) = &federated_user {
            if sync_mode != SyncMode::Force {
                if let Some(seed) = user
                    .get_attribute(&attribute)
                    .and_then(|values| AttributeValue::from_stored(values))
                {
                    tracing::debug!(
                        flow = %context.flow_id,
                        user = %context.username,
                        attribute = %attribute,
                        "seeding cache from existing federated user"
                    );
                    cache.insert(&attribute, context.flow_id, ResolvedValue::Value(seed));
                }
            }
        }

        let resolution = self
            .resolve(store, realm, mapper, context, cache, federated_user.as_ref())
            .await?;
        if let Resolution::Applied { attribute, value } = &resolution {
            context.apply_attribute(attribute, value);
        }
        Ok(resolution)
    }

    async fn try_update(
        &self,
        store: &dyn UserProvider,
        realm: &Realm,
        mapper: &MapperConfig,
        context: &BrokeredContext,
        cache: &mut AttemptCache,
        user: &mut User,
    ) -> BrokerResult<Resolution> {
        let resolution = self
            .resolve(store, realm, mapper, context, cache, Some(&*user))
            .await?;
        if let Resolution::Applied { attribute, value } = &resolution {
            user.apply_attribute(attribute, value);
            tracing::debug!(
                flow = %context.flow_id,
                attribute = %attribute,
                user = %user.username,
                "attribute updated on user"
            );
        }
        Ok(resolution)
    }

    /// The decision engine. Rules are evaluated in order; the first match
    /// wins.
    async fn resolve(
        &self,
        store: &dyn UserProvider,
        realm: &Realm,
        mapper: &MapperConfig,
        context: &BrokeredContext,
        cache: &mut AttemptCache,
        known_user: Option<&User>,
    ) -> BrokerResult<Resolution> {
        let Some(attribute) = mapper.user_attribute() else {
            tracing::warn!(
                flow = %context.flow_id,
                "user attribute name is not configured, skipping mapper"
            );
            return Ok(Resolution::Skipped(SkipReason::MissingAttributeName));
        };

        // A value resolved earlier in this attempt wins, the preserve marker
        // included. Guarantees at most one fetch per attempt and identical
        // pre-/post-phase writes.
        if let Some(cached) = cache.get(&attribute, context.flow_id) {
            tracing::debug!(
                flow = %context.flow_id,
                attribute = %attribute,
                "using cached value"
            );
            return Ok(Resolution::Applied {
                attribute,
                value: cached.clone(),
            });
        }

        let sync_mode = mapper.sync_mode(context.provider_sync_mode)?;

        if sync_mode == SyncMode::Import {
            // IMPORT never overwrites attributes on re-login.
            if known_user.is_some() {
                tracing::debug!(
                    flow = %context.flow_id,
                    attribute = %attribute,
                    "import mode with known user, preserving stored value"
                );
                return Ok(Resolution::Applied {
                    attribute,
                    value: ResolvedValue::Preserve,
                });
            }

            // A first-time flow that collides with a registered account is a
            // linking scenario; IMPORT must not populate new attribute data
            // for it.
            tracing::debug!(
                flow = %context.flow_id,
                "evaluating account-linking scenario in import mode"
            );
            if let Some(duplicate) = find_duplicate(store, realm, context).await? {
                tracing::debug!(
                    flow = %context.flow_id,
                    matched = %duplicate.attribute,
                    value = %duplicate.value,
                    "existing user found, remote data will not be fetched"
                );
                let stored = store
                    .get_by_id(realm.id, duplicate.user_id)
                    .await?
                    .as_ref()
                    .and_then(|user| user.get_attribute(&attribute))
                    .and_then(|values| AttributeValue::from_stored(values));
                let resolved = match stored {
                    Some(value) => ResolvedValue::Value(value),
                    None => ResolvedValue::Preserve,
                };
                cache.insert(&attribute, context.flow_id, resolved.clone());
                return Ok(Resolution::Applied {
                    attribute,
                    value: resolved,
                });
            }
            tracing::debug!(
                flow = %context.flow_id,
                user = %context.username,
                "no duplication found, remote data will be fetched"
            );
        }

        // Remote fetch. Empty results never overwrite anything and are
        // never cached.
        let fetched = self.source.fetch(context).await?;
        let Some(value) = fetched.filter(|value| !value.is_empty()) else {
            tracing::warn!(
                flow = %context.flow_id,
                attribute = %attribute,
                "no value fetched, skipping update"
            );
            return Ok(Resolution::Skipped(SkipReason::NoRemoteValue));
        };

        tracing::debug!(
            flow = %context.flow_id,
            attribute = %attribute,
            "caching fetched value"
        );
        cache.insert(
            &attribute,
            context.flow_id,
            ResolvedValue::Value(value.clone()),
        );
        Ok(Resolution::Applied {
            attribute,
            value: ResolvedValue::Value(value),
        })
    }
}
