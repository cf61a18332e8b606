//! Debounced draft persistence and the restore prompt guard.
//!
//! Drafts are stored per video under [`storage_key`]. Every list change
//! after the initial load re-arms the debounce deadline; only the trailing
//! list of a burst is written. The host polls with the current time when its
//! timer fires.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Millis;
use crate::rally::Rally;

/// Prefix of every draft key.
pub const DRAFT_KEY_PREFIX: &str = "rallyviewer_draft_";

pub fn storage_key(video_id: &str) -> String {
    format!("{DRAFT_KEY_PREFIX}{video_id}")
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("failed to read draft: {0}")]
    Read(String),
    #[error("failed to write draft: {0}")]
    Write(String),
    #[error("failed to remove draft: {0}")]
    Remove(String),
    #[error("malformed draft: {0}")]
    Serialize(String),
}

/// Key/value storage capability (localStorage in the browser).
pub trait DraftStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// One persisted editing snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    pub rallies: Vec<Rally>,
    /// Epoch milliseconds.
    pub saved_at: i64,
}

impl DraftRecord {
    pub fn saved_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.saved_at)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PendingSave {
    rallies: Vec<Rally>,
    due_at: Millis,
}

/// Autosave state for one video.
#[derive(Debug)]
pub struct AutoSave<S> {
    storage: S,
    key: String,
    debounce: Millis,
    loaded: bool,
    saved: Option<DraftRecord>,
    pending: Option<PendingSave>,
    last_saved_at: Option<i64>,
    restore_checked: bool,
}

impl<S: DraftStorage> AutoSave<S> {
    pub fn new(storage: S, video_id: &str, debounce_ms: u32) -> Self {
        Self {
            storage,
            key: storage_key(video_id),
            debounce: f64::from(debounce_ms),
            loaded: false,
            saved: None,
            pending: None,
            last_saved_at: None,
            restore_checked: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Reads the existing draft. Only the first call touches storage.
    pub fn load(&mut self) -> Option<&DraftRecord> {
        if !self.loaded {
            self.loaded = true;
            self.saved = match self.read() {
                Ok(record) => record,
                Err(err) => {
                    tracing::warn!(key = %self.key, %err, "ignoring unreadable draft");
                    None
                }
            };
            if let Some(record) = &self.saved {
                self.last_saved_at = Some(record.saved_at);
                tracing::info!(
                    key = %self.key,
                    count = record.rallies.len(),
                    "draft loaded"
                );
            }
        }
        self.saved.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The last draft read or written.
    pub fn saved(&self) -> Option<&DraftRecord> {
        self.saved.as_ref()
    }

    /// Re-arms the debounce with the latest list. Changes before
    /// [`AutoSave::load`] are ignored.
    pub fn schedule(&mut self, rallies: Vec<Rally>, now: Millis) {
        if !self.loaded {
            return;
        }
        self.pending = Some(PendingSave {
            rallies,
            due_at: now + self.debounce,
        });
    }

    /// When the pending write becomes due.
    pub fn due_at(&self) -> Option<Millis> {
        self.pending.as_ref().map(|p| p.due_at)
    }

    /// A write is waiting for its debounce.
    pub fn is_saving(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_saved_at(&self) -> Option<i64> {
        self.last_saved_at
    }

    /// [`AutoSave::last_saved_at`] as a UTC timestamp, for display.
    pub fn last_saved_at_utc(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at.and_then(DateTime::from_timestamp_millis)
    }

    /// Writes the pending list if its deadline has passed. Returns whether a
    /// write succeeded.
    pub fn poll(&mut self, now: Millis) -> bool {
        match &self.pending {
            Some(pending) if now >= pending.due_at => self.flush(now),
            _ => false,
        }
    }

    /// Writes the pending list immediately.
    pub fn flush(&mut self, now: Millis) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        #[allow(clippy::cast_possible_truncation)]
        let record = DraftRecord {
            rallies: pending.rallies,
            saved_at: now as i64,
        };
        match self.write(&record) {
            Ok(()) => {
                tracing::debug!(key = %self.key, count = record.rallies.len(), "draft saved");
                self.last_saved_at = Some(record.saved_at);
                self.saved = Some(record);
                true
            }
            Err(err) => {
                tracing::warn!(key = %self.key, %err, "autosave skipped");
                false
            }
        }
    }

    /// One-shot check whether the draft should be offered over `server`.
    ///
    /// True only on the first call, and only if a non-empty draft differs
    /// from the server rallies.
    pub fn check_restore(&mut self, server: &[Rally]) -> bool {
        if self.restore_checked {
            return false;
        }
        self.restore_checked = true;
        self.saved
            .as_ref()
            .is_some_and(|draft| !draft.rallies.is_empty() && draft.rallies != server)
    }

    /// Rallies to hand to the editor when the user accepts the restore.
    pub fn restorable(&self) -> Option<&[Rally]> {
        self.saved.as_ref().map(|draft| draft.rallies.as_slice())
    }

    /// Deletes the persisted draft and forgets it.
    pub fn discard(&mut self) {
        self.pending = None;
        self.saved = None;
        self.last_saved_at = None;
        if let Err(err) = self.storage.remove(&self.key) {
            tracing::warn!(key = %self.key, %err, "failed to discard draft");
        } else {
            tracing::info!(key = %self.key, "draft discarded");
        }
    }

    fn read(&self) -> Result<Option<DraftRecord>, StorageError> {
        let Some(raw) = self.storage.get(&self.key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| StorageError::Serialize(err.to_string()))
    }

    fn write(&self, record: &DraftRecord) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(record).map_err(|err| StorageError::Serialize(err.to_string()))?;
        self.storage.set(&self.key, &raw)
    }
}
