//! # idb-broker
//!
//! Remote attribute enrichment for brokered identity federation.
//!
//! On each federation attempt the [`mapper::RemoteAttributeMapper`] decides,
//! for a configured user attribute, whether to keep an existing stored
//! value, reuse a value resolved earlier in the same attempt, suppress
//! fetching because the attempt is actually linking to an existing account,
//! or fetch a fresh value from a [`remote::RemoteSource`]. Resolution is
//! best-effort: failures are logged and reported, never escalated into a
//! failed login.
//!
//! The host framework invokes the mapper twice per attempt (before and
//! after the local user record exists) with a shared [`cache::AttemptCache`],
//! which bounds each attempt to at most one remote fetch.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod applier;
pub mod cache;
pub mod coerce;
pub mod config;
pub mod context;
pub mod duplicate;
pub mod error;
pub mod mapper;
pub mod remote;
pub mod value;

pub use applier::AttributeApplier;
pub use cache::{AttemptCache, CacheKey};
pub use coerce::coerce;
pub use config::{MapperConfig, SyncMode, CONF_ATTRIBUTE_NAME, CONF_SYNC_MODE};
pub use context::BrokeredContext;
pub use duplicate::{find_duplicate, DuplicateAttribute, DuplicateMatch};
pub use error::{BrokerError, BrokerResult};
pub use mapper::{RemoteAttributeMapper, Resolution, SkipReason, MAPPER_TYPE};
pub use remote::{HttpRemoteSource, RemoteSource, RemoteSourceConfig};
pub use value::{AttributeValue, ResolvedValue};
