use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use log::debug;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::auth::Credential;
use crate::model::UserProfile;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("credential is not valid for this profile")]
    Unauthorized,
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
    #[error("no profile stored for {0}")]
    NotFound(String),
    #[error("profile payload could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Remote home of a user's profile. Writes replace the whole document.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load(&self, credential: &Credential, user_id: Uuid)
        -> Result<UserProfile, StoreError>;

    async fn save(&self, credential: &Credential, profile: &UserProfile)
        -> Result<(), StoreError>;
}

/// Keeps serialized profiles in memory, keyed by user id. Tokens must be
/// registered before they are accepted.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    tokens: RwLock<HashMap<String, Uuid>>,
    documents: RwLock<HashMap<Uuid, String>>,
    offline: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, credential: &Credential, user_id: Uuid) {
        self.tokens
            .write()
            .await
            .insert(credential.token().to_string(), user_id);
    }

    /// Simulates an outage: every call fails with `Unavailable` while set.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    async fn authorize(&self, credential: &Credential, user_id: Uuid) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }
        match self.tokens.read().await.get(credential.token()) {
            Some(owner) if *owner == user_id => Ok(()),
            _ => Err(StoreError::Unauthorized),
        }
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load(
        &self,
        credential: &Credential,
        user_id: Uuid,
    ) -> Result<UserProfile, StoreError> {
        self.authorize(credential, user_id).await?;
        let documents = self.documents.read().await;
        let document = documents
            .get(&user_id)
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()))?;
        Ok(serde_json::from_str(document)?)
    }

    async fn save(&self, credential: &Credential, profile: &UserProfile) -> Result<(), StoreError> {
        self.authorize(credential, profile.id).await?;
        let document = serde_json::to_string(profile)?;
        self.documents.write().await.insert(profile.id, document);
        self.saves.fetch_add(1, Ordering::SeqCst);
        debug!(target: "sync", "Stored profile {}", profile.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_then_load() {
        let store = InMemoryProfileStore::new();
        let profile = UserProfile::new("Ada");
        let credential = Credential::new("token-a");
        store.register(&credential, profile.id).await;

        assert!(matches!(
            store.load(&credential, profile.id).await,
            Err(StoreError::NotFound(_))
        ));
        store.save(&credential, &profile).await.unwrap();
        let loaded = store.load(&credential, profile.id).await.unwrap();
        assert_eq!(loaded, profile);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_foreign_token_is_unauthorized() {
        let store = InMemoryProfileStore::new();
        let profile = UserProfile::new("Ada");
        let other = Credential::new("token-b");
        store.register(&other, Uuid::new_v4()).await;

        assert!(matches!(
            store.save(&other, &profile).await,
            Err(StoreError::Unauthorized)
        ));
        assert!(matches!(
            store.save(&Credential::new("unknown"), &profile).await,
            Err(StoreError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_offline_store_is_unavailable() {
        let store = InMemoryProfileStore::new();
        let profile = UserProfile::new("Ada");
        let credential = Credential::new("token-a");
        store.register(&credential, profile.id).await;

        store.set_offline(true);
        assert!(matches!(
            store.save(&credential, &profile).await,
            Err(StoreError::Unavailable(_))
        ));
        store.set_offline(false);
        assert!(store.save(&credential, &profile).await.is_ok());
    }
}
