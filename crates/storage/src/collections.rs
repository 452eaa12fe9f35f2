//! Typed access to JSON-encoded collections.
//!
//! Every entity type lives under exactly one key in [`keys`]. Loading never
//! fails: an absent, unreadable or malformed blob yields the default value.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use super::{KvStore, Result};

/// Canonical storage keys, one per entity type.
pub mod keys {
    /// All projects, with their tasks and payments
    pub const PROJECTS: &str = "fynkr_projects";
    /// Sent client invitations
    pub const CLIENT_INVITATIONS: &str = "fynkr_client_invitations";
    /// User preferences
    pub const SETTINGS: &str = "fynkr_settings";
}

/// Load the collection stored under `key`, empty if absent or unreadable.
pub async fn load_collection<T, S>(store: &S, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: KvStore + ?Sized,
{
    load_document(store, key).await
}

/// Load a single JSON document, `T::default()` if absent or unreadable.
pub async fn load_document<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KvStore + ?Sized,
{
    match store.load(key).await {
        Ok(Some(text)) => match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "stored data is malformed, starting from defaults");
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            warn!(key, error = %e, "failed to read stored data, starting from defaults");
            T::default()
        }
    }
}

/// Encode `items` and store them under `key`.
pub async fn save_collection<T, S>(store: &mut S, key: &str, items: &[T]) -> Result<()>
where
    T: Serialize,
    S: KvStore + ?Sized,
{
    save_document(store, key, items).await
}

/// Encode a single document and store it under `key`.
pub async fn save_document<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KvStore + ?Sized,
{
    let json = serde_json::to_string_pretty(value)?;
    store.save(key, &json).await
}
