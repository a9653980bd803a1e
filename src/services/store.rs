use crate::models::{BuyerProfile, House};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{watch, Mutex};

/// Errors that can occur with local store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Notification published whenever a document changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub key: String,
    pub version: u64,
}

/// Document keys
pub struct StoreKey;

impl StoreKey {
    pub const SESSION_ID: &'static str = "session_id";
    pub const USER_PROFILE: &'static str = "user_profile";
    pub const HOUSES: &'static str = "houses";

    pub const ALL: [&'static str; 3] = [Self::SESSION_ID, Self::USER_PROFILE, Self::HOUSES];
}

/// Local key-value store of whole JSON documents
///
/// Two tiers: an in-memory moka cache in front of one JSON file per key.
/// Every write replaces the whole document; when two processes share a
/// directory the last full write wins. Without a directory the store is
/// memory-only.
pub struct LocalStore {
    dir: Option<PathBuf>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    // Serializes read-modify-write within this process
    write_lock: Mutex<()>,
    // Last published content per key; unlike the L1 tier it never expires
    fingerprints: Mutex<HashMap<String, u64>>,
    version: AtomicU64,
    changes: watch::Sender<StoreEvent>,
}

impl LocalStore {
    /// Open a file-backed store rooted at `dir`
    pub async fn open(dir: impl AsRef<Path>, l1_size: u64, ttl: Duration) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;

        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(ttl)
            .build();

        let shown = dir.display().to_string();
        let store = Self::with_parts(Some(dir), l1_cache);

        // Documents already on disk are the baseline, not changes
        {
            let mut fingerprints = store.fingerprints.lock().await;
            for key in StoreKey::ALL {
                if let Some(bytes) = store.read_disk(key).await? {
                    fingerprints.insert(key.to_string(), fingerprint(&bytes));
                }
            }
        }

        tracing::debug!("Opened local store at {}", shown);
        Ok(store)
    }

    /// A store that keeps documents in memory only
    pub fn in_memory() -> Self {
        // No TTL: the cache is the only copy
        let l1_cache = moka::future::CacheBuilder::new(StoreKey::ALL.len() as u64 * 16).build();
        Self::with_parts(None, l1_cache)
    }

    fn with_parts(dir: Option<PathBuf>, l1_cache: moka::future::Cache<String, Vec<u8>>) -> Self {
        let (changes, _) = watch::channel(StoreEvent {
            key: String::new(),
            version: 0,
        });

        Self {
            dir,
            l1_cache,
            write_lock: Mutex::new(()),
            fingerprints: Mutex::new(HashMap::new()),
            version: AtomicU64::new(0),
            changes,
        }
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(format!("{}.json", key)))
    }

    /// Receive a notification after every change, local or re-read from disk
    pub fn subscribe(&self) -> watch::Receiver<StoreEvent> {
        self.changes.subscribe()
    }

    fn notify(&self, key: &str) {
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        self.changes.send_replace(StoreEvent {
            key: key.to_string(),
            version,
        });
    }

    async fn read_disk(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let Some(path) = self.path_for(key) else {
            return Ok(None);
        };

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 store hit: {}", key);
            return Ok(Some(bytes));
        }

        let bytes = self.read_disk(key).await?;
        if let Some(bytes) = &bytes {
            tracing::trace!("Disk store hit: {}", key);
            self.l1_cache.insert(key.to_string(), bytes.clone()).await;
        }
        Ok(bytes)
    }

    /// Read a document
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        match self.get_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn write(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        if let Some(path) = self.path_for(key) {
            // Write then rename so readers never see a partial document
            let tmp = path.with_extension("json.tmp");
            tokio::fs::write(&tmp, &bytes).await?;
            tokio::fs::rename(&tmp, &path).await?;
        }

        self.fingerprints
            .lock()
            .await
            .insert(key.to_string(), fingerprint(&bytes));
        self.l1_cache.insert(key.to_string(), bytes).await;
        self.notify(key);

        tracing::trace!("Store set: {}", key);
        Ok(())
    }

    /// Replace a document
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), StoreError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        let _guard = self.write_lock.lock().await;
        self.write(key, bytes).await
    }

    /// Read, modify and write back a document, starting from `T::default()`
    /// when it does not exist yet
    pub async fn update<T, R, F>(&self, key: &str, f: F) -> Result<R, StoreError>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T) -> R,
    {
        let _guard = self.write_lock.lock().await;

        let mut value: T = match self.get_bytes(key).await? {
            Some(bytes) => serde_json::from_slice(&bytes)?,
            None => T::default(),
        };
        let result = f(&mut value);

        self.write(key, serde_json::to_vec(&value)?).await?;
        Ok(result)
    }

    /// Delete a document from both tiers
    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        if let Some(path) = self.path_for(key) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        self.fingerprints.lock().await.remove(key);
        self.l1_cache.invalidate(key).await;
        self.notify(key);
        Ok(())
    }

    /// Re-read every document from disk and publish the ones that differ from
    /// what this store last wrote or saw
    ///
    /// Returns the number of changed documents. Memory-only stores never change.
    pub async fn refresh(&self) -> Result<usize, StoreError> {
        if self.dir.is_none() {
            return Ok(0);
        }

        let _guard = self.write_lock.lock().await;

        let mut changed = 0;
        for key in StoreKey::ALL {
            let on_disk = self.read_disk(key).await?;
            let current = on_disk.as_deref().map(fingerprint);

            {
                let mut fingerprints = self.fingerprints.lock().await;
                if fingerprints.get(key).copied() == current {
                    continue;
                }
                match current {
                    Some(fp) => fingerprints.insert(key.to_string(), fp),
                    None => fingerprints.remove(key),
                };
            }

            match on_disk {
                Some(bytes) => self.l1_cache.insert(key.to_string(), bytes).await,
                None => self.l1_cache.invalidate(key).await,
            }
            self.notify(key);
            changed += 1;
        }

        if changed > 0 {
            tracing::debug!("Store refresh picked up {} changed documents", changed);
        }
        Ok(changed)
    }

    /// Periodically re-read the store so other writers' changes show up
    pub fn spawn_sync(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = self.refresh().await {
                    tracing::warn!("Store refresh failed: {}", e);
                }
            }
        })
    }

    /// The browser-session identifier, created on first use
    pub async fn session_id(&self) -> Result<String, StoreError> {
        if let Some(id) = self.get::<String>(StoreKey::SESSION_ID).await? {
            return Ok(id);
        }

        let new_id = new_session_id();
        let id = self
            .update(StoreKey::SESSION_ID, move |current: &mut Option<String>| {
                current.get_or_insert(new_id).clone()
            })
            .await?;
        Ok(id)
    }

    pub async fn houses(&self) -> Result<Vec<House>, StoreError> {
        Ok(self.get(StoreKey::HOUSES).await?.unwrap_or_default())
    }

    pub async fn save_houses(&self, houses: &[House]) -> Result<(), StoreError> {
        self.set(StoreKey::HOUSES, &houses).await
    }

    pub async fn profile(&self) -> Result<Option<BuyerProfile>, StoreError> {
        self.get(StoreKey::USER_PROFILE).await
    }

    pub async fn save_profile(&self, profile: &BuyerProfile) -> Result<(), StoreError> {
        self.set(StoreKey::USER_PROFILE, profile).await
    }

    pub async fn clear_profile(&self) -> Result<(), StoreError> {
        self.remove(StoreKey::USER_PROFILE).await
    }
}

fn fingerprint(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

/// `session_{unix millis}_{9 random chars}`
fn new_session_id() -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("session_{}_{}", chrono::Utc::now().timestamp_millis(), &random[..9])
}
