//! Persistent favorite landmarks
//!
//! Favorites live in an embedded fjall keyspace as a single postcard-encoded
//! list, which keeps insertion order and makes duplicates impossible.

use std::fmt::Display;
use std::path::Path;

use fjall::{Database, Keyspace, PersistMode};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task;

use crate::{ExplorerError, Result};

const FAVORITES_KEY: &[u8] = b"favorites";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredFavorites {
    ids: Vec<String>,
}

pub struct FavoritesStore {
    db: Database,
    store: Keyspace,
    // Serialises read-modify-write cycles
    write_lock: Mutex<()>,
}

fn storage_error(e: impl Display) -> ExplorerError {
    ExplorerError::storage(e.to_string())
}

fn read_favorites(store: &Keyspace) -> Result<StoredFavorites> {
    match store.get(FAVORITES_KEY).map_err(storage_error)? {
        Some(bytes) => postcard::from_bytes(&bytes).map_err(storage_error),
        None => Ok(StoredFavorites::default()),
    }
}

fn write_favorites(db: &Database, store: &Keyspace, favorites: &StoredFavorites) -> Result<()> {
    let bytes = postcard::to_stdvec(favorites).map_err(storage_error)?;
    store.insert(FAVORITES_KEY, bytes).map_err(storage_error)?;
    db.persist(PersistMode::SyncAll).map_err(storage_error)?;
    Ok(())
}

impl FavoritesStore {
    /// Open (or create) the store under `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::builder(path.as_ref()).open().map_err(storage_error)?;
        let store = db
            .keyspace("favorites", fjall::KeyspaceCreateOptions::default)
            .map_err(storage_error)?;
        tracing::debug!(path = %path.as_ref().display(), "Opened favorites store");
        Ok(Self {
            db,
            store,
            write_lock: Mutex::new(()),
        })
    }

    /// Favorite landmark ids in the order they were added
    #[tracing::instrument(name = "list_favorites", level = "debug", skip(self))]
    pub async fn list(&self) -> Result<Vec<String>> {
        let store = self.store.clone();
        let favorites = task::spawn_blocking(move || read_favorites(&store))
            .await
            .map_err(storage_error)??;
        Ok(favorites.ids)
    }

    pub async fn contains(&self, id: &str) -> Result<bool> {
        Ok(self.list().await?.iter().any(|fav| fav == id))
    }

    /// Add `id`; returns false if it was already a favorite
    #[tracing::instrument(name = "add_favorite", level = "debug", skip(self))]
    pub async fn add(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.update(move |ids| {
            if ids.contains(&id) {
                false
            } else {
                ids.push(id);
                true
            }
        })
        .await
    }

    /// Remove `id`; returns false if it was not a favorite
    #[tracing::instrument(name = "remove_favorite", level = "debug", skip(self))]
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.update(move |ids| {
            let before = ids.len();
            ids.retain(|fav| *fav != id);
            ids.len() != before
        })
        .await
    }

    /// Flip membership of `id`; returns whether it is a favorite afterwards
    pub async fn toggle(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        self.update(move |ids| {
            if let Some(index) = ids.iter().position(|fav| *fav == id) {
                ids.remove(index);
                false
            } else {
                ids.push(id);
                true
            }
        })
        .await
    }

    /// Apply `change` to the stored list and persist it if the list changed.
    /// Returns whatever `change` returns.
    async fn update<F>(&self, change: F) -> Result<bool>
    where
        F: FnOnce(&mut Vec<String>) -> bool + Send + 'static,
    {
        let _guard = self.write_lock.lock().await;
        let db = self.db.clone();
        let store = self.store.clone();

        task::spawn_blocking(move || {
            let mut favorites = read_favorites(&store)?;
            let before = favorites.ids.clone();
            let outcome = change(&mut favorites.ids);
            if favorites.ids == before {
                tracing::debug!("Favorites unchanged");
            } else {
                write_favorites(&db, &store, &favorites)?;
            }
            Ok(outcome)
        })
        .await
        .map_err(storage_error)?
    }
}
