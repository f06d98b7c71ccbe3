//! # Feedback Store
//!
//! Feedback submitted through the API is kept in a single pretty-printed
//! JSON array file. A missing file reads as an empty list. A file that
//! exists but does not parse is reported as [`FeedbackError::Corrupt`] and
//! left untouched.
//!
//! Writers are serialised by a mutex and replace the file via a sibling
//! temporary file plus rename, so readers never observe a partial write.
//! A failed write leaves no temporary file behind.
//! All methods block; async callers go through `spawn_blocking`.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Errors from the feedback file.
#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("feedback file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("feedback file {path} is not a JSON array of entries: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Review state of a feedback entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    Pending,
    Reviewed,
    Resolved,
}

impl FeedbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for FeedbackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "reviewed" => Ok(Self::Reviewed),
            "resolved" => Ok(Self::Resolved),
            other => Err(format!(
                "unknown feedback status {other:?}; expected pending, reviewed or resolved"
            )),
        }
    }
}

/// A stored feedback entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeedbackEntry {
    /// `fb_<yyyymmddHHMMSS>_<8 hex>`.
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub category: String,
    pub message: String,
    #[schema(value_type = Object)]
    pub context: serde_json::Value,
    pub status: FeedbackStatus,
}

/// Caller-supplied fields of a new entry.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub user_id: String,
    pub category: String,
    pub message: String,
    pub context: serde_json::Value,
}

/// Build a feedback id from a timestamp plus a random suffix.
pub fn feedback_id(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("fb_{}_{}", now.format("%Y%m%d%H%M%S"), &suffix[..8])
}

/// JSON-file backed feedback store.
#[derive(Debug)]
pub struct FeedbackStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FeedbackStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry, oldest first.
    pub fn load(&self) -> Result<Vec<FeedbackEntry>, FeedbackError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(FeedbackError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_slice(&raw).map_err(|source| FeedbackError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Append a new pending entry and persist it.
    pub fn submit(&self, new: NewFeedback) -> Result<FeedbackEntry, FeedbackError> {
        let _guard = self.write_lock.lock();

        let mut entries = self.load()?;
        let now = Utc::now();
        let entry = FeedbackEntry {
            id: feedback_id(now),
            timestamp: now,
            user_id: new.user_id,
            category: new.category,
            message: new.message,
            context: new.context,
            status: FeedbackStatus::Pending,
        };
        entries.push(entry.clone());
        self.save(&entries)?;

        tracing::info!(feedback_id = %entry.id, category = %entry.category, "feedback stored");
        Ok(entry)
    }

    /// The newest `limit` entries matching `status`, oldest first.
    pub fn list(
        &self,
        status: Option<FeedbackStatus>,
        limit: usize,
    ) -> Result<Vec<FeedbackEntry>, FeedbackError> {
        let mut entries = self.load()?;
        if let Some(status) = status {
            entries.retain(|e| e.status == status);
        }
        let skip = entries.len().saturating_sub(limit);
        Ok(entries.split_off(skip))
    }

    fn save(&self, entries: &[FeedbackEntry]) -> Result<(), FeedbackError> {
        let io_err = |source: io::Error| FeedbackError::Io {
            path: self.path.clone(),
            source,
        };
        let json = serde_json::to_vec_pretty(entries).map_err(|e| io_err(io::Error::other(e)))?;

        // Unpersisted temp files are removed on drop.
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&json).map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}
