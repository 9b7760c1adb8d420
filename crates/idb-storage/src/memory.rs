//! In-memory user storage.
//!
//! Backs tests and embedded deployments. Uniqueness of username and email is
//! enforced per realm the way a SQL backend would via constraints.

use std::collections::HashMap;

use async_trait::async_trait;
use idb_model::User;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{StorageError, StorageResult};
use crate::user::UserProvider;

/// In-memory [`UserProvider`] backed by a guarded map.
#[derive(Debug, Default)]
pub struct MemoryUserProvider {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    /// Returns true if no users are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl UserProvider for MemoryUserProvider {
    async fn create(&self, user: &User) -> StorageResult<()> {
        let mut users = self.users.write();

        for existing in users.values().filter(|u| u.realm_id == user.realm_id) {
            if existing.username == user.username {
                return Err(StorageError::duplicate("User", "username", &user.username));
            }
            if let (Some(a), Some(b)) = (&existing.email, &user.email) {
                if a == b {
                    return Err(StorageError::duplicate("User", "email", b));
                }
            }
        }

        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> StorageResult<()> {
        let mut users = self.users.write();
        if !users.contains_key(&user.id) {
            return Err(StorageError::not_found("User", user.id));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_by_id(&self, realm_id: Uuid, id: Uuid) -> StorageResult<Option<User>> {
        Ok(self
            .users
            .read()
            .get(&id)
            .filter(|u| u.realm_id == realm_id)
            .cloned())
    }

    async fn get_by_username(&self, realm_id: Uuid, username: &str) -> StorageResult<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.realm_id == realm_id && u.username == username)
            .cloned())
    }

    async fn get_by_email(&self, realm_id: Uuid, email: &str) -> StorageResult<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.realm_id == realm_id && u.email.as_deref() == Some(email))
            .cloned())
    }

    async fn get_by_federated_identity(
        &self,
        realm_id: Uuid,
        provider_alias: &str,
        external_user_id: &str,
    ) -> StorageResult<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| {
                u.realm_id == realm_id
                    && u.has_federated_identity(provider_alias, external_user_id)
            })
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idb_model::FederatedIdentity;

    #[tokio::test]
    async fn create_and_lookup() {
        let store = MemoryUserProvider::new();
        let realm_id = Uuid::now_v7();
        let user = User::new(realm_id, "jdoe").with_email("jdoe@example.com");

        store.create(&user).await.unwrap();

        let by_id = store.get_by_id(realm_id, user.id).await.unwrap();
        assert_eq!(by_id.map(|u| u.username), Some("jdoe".to_string()));

        let by_username = store.get_by_username(realm_id, "jdoe").await.unwrap();
        assert!(by_username.is_some());

        let by_email = store.get_by_email(realm_id, "jdoe@example.com").await.unwrap();
        assert!(by_email.is_some());

        // Wrong realm sees nothing
        let other_realm = Uuid::now_v7();
        assert!(store.get_by_id(other_realm, user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_rejected() {
        let store = MemoryUserProvider::new();
        let realm_id = Uuid::now_v7();

        store.create(&User::new(realm_id, "jdoe")).await.unwrap();
        let err = store.create(&User::new(realm_id, "jdoe")).await.unwrap_err();
        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let store = MemoryUserProvider::new();
        let realm_id = Uuid::now_v7();

        store
            .create(&User::new(realm_id, "jdoe").with_email("j@example.com"))
            .await
            .unwrap();
        let err = store
            .create(&User::new(realm_id, "other").with_email("j@example.com"))
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn lookup_by_federated_identity() {
        let store = MemoryUserProvider::new();
        let realm_id = Uuid::now_v7();
        let user = User::new(realm_id, "jdoe")
            .with_federated_identity(FederatedIdentity::new("corporate-oidc", "ext-123"));

        store.create(&user).await.unwrap();

        let found = store
            .get_by_federated_identity(realm_id, "corporate-oidc", "ext-123")
            .await
            .unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));

        let missing = store
            .get_by_federated_identity(realm_id, "corporate-oidc", "ext-999")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn update_requires_existing() {
        let store = MemoryUserProvider::new();
        let realm_id = Uuid::now_v7();
        let user = User::new(realm_id, "jdoe");

        let err = store.update(&user).await.unwrap_err();
        assert!(err.is_not_found());

        store.create(&user).await.unwrap();
        let mut updated = user.clone();
        updated.set_attribute("department", vec!["Sales".to_string()]);
        store.update(&updated).await.unwrap();

        let fetched = store.get_by_id(realm_id, user.id).await.unwrap().unwrap();
        assert_eq!(fetched.get_first_attribute("department"), Some("Sales"));
    }
}
