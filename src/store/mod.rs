pub mod models;

use std::ffi::{OsStr, OsString};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use models::{Replies, ReplyEntry, TriggerCase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("trigger is empty")]
    EmptyTrigger,
    #[error("response is empty")]
    EmptyResponse,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("replies file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("replies file {} is malformed: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("failed to encode replies: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    Added,
    Replaced,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    Removed(ReplyEntry),
    NotFound,
}

/// Trigger => response table persisted as a single JSON object.
///
/// The file is re-read on every access. Mutations run a full
/// load-modify-save cycle under `write_lock`, and saves replace the file
/// through a rename of a per-save temp file, so a crash mid-write never
/// leaves a truncated table. Readers finding no file only ever create it
/// with `create_new`.
/// Separate processes sharing the file still race (last writer wins).
pub struct ReplyStore {
    path: PathBuf,
    case: TriggerCase,
    write_lock: Mutex<()>,
}

impl ReplyStore {
    pub fn new(path: impl Into<PathBuf>, case: TriggerCase) -> Self {
        Self {
            path: path.into(),
            case,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the table, falling back to an empty one on any failure.
    pub async fn load(&self) -> Replies {
        match self.read().await {
            Ok(replies) => replies,
            Err(e) => {
                tracing::error!("Failed to load replies, using an empty table: {}", e);
                Replies::new()
            }
        }
    }

    pub async fn save(&self, replies: &Replies) -> Result<(), StoreError> {
        let body = serde_json::to_string_pretty(&replies.to_json_object())?;

        // Unique per save, so concurrent saves never share a temp file.
        let mut tmp_name = OsString::from(".");
        tmp_name.push(self.path.file_name().unwrap_or(OsStr::new("replies.json")));
        tmp_name.push(format!(".{}.tmp", uuid::Uuid::new_v4().simple()));
        let tmp_path = self.path.with_file_name(tmp_name);

        tokio::fs::write(&tmp_path, body.as_bytes())
            .await
            .map_err(|source| self.io_error(source))?;
        if let Err(source) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(self.io_error(source));
        }

        Ok(())
    }

    pub async fn upsert(&self, trigger: &str, response: &str) -> Result<Upserted, StoreError> {
        let trigger = self.case.normalize(trigger);
        let response = response.trim();
        if trigger.is_empty() {
            return Err(ValidationError::EmptyTrigger.into());
        }
        if response.is_empty() {
            return Err(ValidationError::EmptyResponse.into());
        }

        let _guard = self.write_lock.lock().await;
        let mut replies = self.read().await?;
        let replaced = replies.insert(trigger.clone(), response.to_string());
        self.save(&replies).await?;

        tracing::info!("Saved reply for trigger {:?} ({} total)", trigger, replies.len());
        Ok(if replaced {
            Upserted::Replaced
        } else {
            Upserted::Added
        })
    }

    pub async fn remove(&self, trigger: &str) -> Result<Removal, StoreError> {
        let trigger = self.case.normalize(trigger);

        let _guard = self.write_lock.lock().await;
        let mut replies = self.read().await?;
        let Some(entry) = replies.remove(&trigger) else {
            return Ok(Removal::NotFound);
        };
        self.save(&replies).await?;

        tracing::info!("Removed reply for trigger {:?}", trigger);
        Ok(Removal::Removed(entry))
    }

    pub async fn list(&self) -> Vec<ReplyEntry> {
        self.load().await.into_entries()
    }

    /// Stored response for a message whose whole text equals a trigger.
    pub async fn lookup(&self, text: &str) -> Option<String> {
        let key = self.case.normalize(text);
        if key.is_empty() {
            return None;
        }
        self.load().await.get(&key).map(str::to_string)
    }

    /// Strict read used by mutations, so a malformed file is reported
    /// instead of being overwritten.
    async fn read(&self) -> Result<Replies, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.create_empty().await;
                return Ok(Replies::new());
            }
            Err(source) => return Err(self.io_error(source)),
        };

        let text = String::from_utf8(bytes).map_err(|e| self.corrupt(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Replies::new());
        }

        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| self.corrupt(e.to_string()))?;
        Replies::from_json_value(value).map_err(|reason| self.corrupt(reason))
    }

    /// Create `{}` only if nothing exists yet. Never replaces a file a
    /// concurrent save has just renamed into place.
    async fn create_empty(&self) {
        let result = async {
            let mut file = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&self.path)
                .await?;
            file.write_all(b"{}").await?;
            file.flush().await
        }
        .await;

        match result {
            Ok(()) => tracing::info!("Created empty replies file {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
            Err(e) => tracing::warn!("Could not create replies file {}: {}", self.path.display(), e),
        }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn corrupt(&self, reason: String) -> StoreError {
        StoreError::Corrupt {
            path: self.path.clone(),
            reason,
        }
    }
}
