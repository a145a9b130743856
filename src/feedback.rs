//! Star ratings for generated results and their append-only log.
//!
//! Records are write-only from the generator's point of view: they are
//! appended as JSON Lines and only read back by inspection tooling.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{FeedbackError, ValidationError};
use crate::session::SessionId;

/// Lowest accepted rating.
pub const MIN_RATING: u8 = 1;
/// Highest accepted rating.
pub const MAX_RATING: u8 = 5;

/// A 1-5 star rating with an optional comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub rating: u8,
    pub comment: Option<String>,
    /// Session that produced the rated result, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    /// The rated result, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_id: Option<Uuid>,
    pub recorded_at: DateTime<Utc>,
}

impl FeedbackRecord {
    /// Create a record, range-checking the rating.
    ///
    /// Blank comments are stored as `None`.
    pub fn new(rating: i64, comment: Option<&str>) -> Result<Self, ValidationError> {
        if rating < i64::from(MIN_RATING) || rating > i64::from(MAX_RATING) {
            return Err(ValidationError::RatingOutOfRange(rating));
        }

        let comment = comment
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(Self {
            rating: rating as u8,
            comment,
            session_id: None,
            result_id: None,
            recorded_at: Utc::now(),
        })
    }

    /// Attach the session and result the rating refers to.
    pub fn for_result(mut self, session_id: SessionId, result_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self.result_id = Some(result_id);
        self
    }

    /// Filled and empty stars, e.g. `★★★☆☆`.
    pub fn stars(&self) -> String {
        let filled = usize::from(self.rating);
        let empty = usize::from(MAX_RATING) - filled;
        format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
    }

    /// Confirmation text shown after the record is stored.
    pub fn summary(&self) -> String {
        match &self.comment {
            Some(comment) => format!("Feedback saved: **{}**\n\nComment: {}", self.stars(), comment),
            None => format!("Feedback saved: **{}**", self.stars()),
        }
    }
}

/// Append-only JSON Lines file of feedback records.
#[derive(Debug, Clone)]
pub struct FeedbackLog {
    path: PathBuf,
}

impl FeedbackLog {
    /// Creates a log writing to `path`. Nothing is touched until the first
    /// record is written.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent(&self) -> Result<(), FeedbackError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    FeedbackError::DirectoryCreationFailed(format!(
                        "Failed to create directory {:?}: {}",
                        parent, e
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Appends one record as a single JSON line.
    pub async fn record(&self, record: &FeedbackRecord) -> Result<(), FeedbackError> {
        self.ensure_parent().await?;

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::info!(
            rating = record.rating,
            has_comment = record.comment.is_some(),
            path = %self.path.display(),
            "Feedback recorded"
        );
        Ok(())
    }

    /// Reads every record back. A missing file yields an empty list.
    pub async fn load_all(&self) -> Result<Vec<FeedbackRecord>, FeedbackError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path).await?;
        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|e| FeedbackError::InvalidRecord {
                    line: idx + 1,
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}
