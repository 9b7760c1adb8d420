//! # idb-storage
//!
//! User storage abstraction for the identity broker.
//!
//! This crate defines the [`UserProvider`] interface the broker consumes for
//! user lookup during federation, and ships an in-memory implementation for
//! tests and embedders. Production backends implement the same trait and own
//! their consistency guarantees.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod memory;
pub mod user;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryUserProvider;
pub use user::UserProvider;
