//! # idb-model
//!
//! Domain models for the identity broker (User, Realm).
//!
//! These are the entities the attribute-resolution engine reads and writes:
//! users with multi-valued custom attributes and federated-identity links,
//! and realms carrying the login policy flags consulted during
//! duplicate-user detection.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod realm;
pub mod user;

pub use realm::Realm;
pub use user::{FederatedIdentity, User};
