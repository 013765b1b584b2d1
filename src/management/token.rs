use std::{
    path::PathBuf,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;

use crate::{config, error::StoreError, types::TokenRecord};

/// Load/save capability for the single persisted [`TokenRecord`].
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Returns `Ok(None)` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<TokenRecord>, StoreError>;

    async fn save(&self, record: &TokenRecord) -> Result<(), StoreError>;
}

/// Stores the token as pretty JSON in a single file.
///
/// Concurrent processes race on the file; the last writer wins.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The per-user default location, `<data_local_dir>/likesync/token.json`.
    pub fn default_location() -> Self {
        Self::new(config::data_dir().join("token.json"))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<TokenRecord>, StoreError> {
        if !self.path.is_file() {
            return Ok(None);
        }

        let content = async_fs::read_to_string(&self.path).await?;
        let record: TokenRecord = serde_json::from_str(&content)?;
        Ok(Some(record))
    }

    async fn save(&self, record: &TokenRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(record)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}

/// Keeps the token in memory; nothing survives the process.
#[derive(Default)]
pub struct MemoryTokenStore {
    record: Mutex<Option<TokenRecord>>,
    saves: AtomicUsize,
}

impl MemoryTokenStore {
    pub fn new(record: Option<TokenRecord>) -> Self {
        Self {
            record: Mutex::new(record),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn current(&self) -> Option<TokenRecord> {
        self.record.lock().ok().and_then(|r| r.clone())
    }

    /// How many times `save` was called.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<TokenRecord>, StoreError> {
        Ok(self.current())
    }

    async fn save(&self, record: &TokenRecord) -> Result<(), StoreError> {
        if let Ok(mut slot) = self.record.lock() {
            *slot = Some(record.clone());
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
