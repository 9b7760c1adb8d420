//! User storage provider trait.

use async_trait::async_trait;
use idb_model::User;
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for user storage operations.
///
/// Implementations must be thread-safe and support concurrent access.
/// The broker only reads through this trait during attribute resolution;
/// writes happen in the surrounding registration/linking pipeline.
#[async_trait]
pub trait UserProvider: Send + Sync {
    /// Creates a new user.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if a user with the same username
    /// (or email, where the backend enforces email uniqueness) exists.
    async fn create(&self, user: &User) -> StorageResult<()>;

    /// Updates an existing user.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the user doesn't exist.
    async fn update(&self, user: &User) -> StorageResult<()>;

    /// Gets a user by ID.
    async fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<User>>;

    /// Gets a user by username.
    async fn get_by_username(&self, realm_id: Uuid, username: &str) -> StorageResult<Option<User>>;

    /// Gets a user by email.
    async fn get_by_email(&self, realm_id: Uuid, email: &str) -> StorageResult<Option<User>>;

    /// Gets a user by a linked external identity.
    ///
    /// Returns the local user that carries a federated-identity link for the
    /// given provider alias and external user id, if any.
    async fn get_by_federated_identity(
        &self,
        realm_id: Uuid,
        provider_alias: &str,
        external_user_id: &str,
    ) -> StorageResult<Option<User>>;
}
