//! Hooks for handing generated documents to the outside world
//!
//! The finishing pipeline only knows the [`ShareTarget`] trait. Concrete
//! targets (e-mail, outbox directory, interactive confirmation) live in the
//! share crate and the CLI.

use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;

/// One document handed to a share target
#[derive(Debug, Clone, Serialize)]
pub struct ShareRequest {
    pub title: String,
    pub subject: String,
    pub message: String,
    pub attachment: PathBuf,
    pub recipients: Vec<String>,
}

/// How a share invocation ended when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareOutcome {
    Shared,
    /// The user dismissed the share action. Not an error.
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("Share cancelled by user")]
    Cancelled,

    #[error("No valid recipients: {0}")]
    NoRecipients(String),

    #[error("Attachment unavailable: {0}")]
    Attachment(String),

    #[error("Share transport failed: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShareError {
    /// Map a platform error message onto a share error.
    ///
    /// Some share bindings only report a message string when the user closes
    /// the sheet; those messages become [`ShareError::Cancelled`].
    pub fn from_platform_message(message: &str) -> Self {
        let lowered = message.to_lowercase();
        if lowered.contains("cancel")
            || message.contains("User did not share")
            || lowered.contains("user cancelled")
        {
            ShareError::Cancelled
        } else {
            ShareError::Transport(message.to_string())
        }
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, ShareError::Cancelled)
    }
}

/// Collapse a cancellation error into [`ShareOutcome::Cancelled`].
///
/// Transport errors go through [`ShareError::from_platform_message`] first, so
/// a target that can only report the dismissal as text is still settled as a
/// cancellation. Every other error is passed through unchanged.
pub fn settle_share(result: Result<ShareOutcome, ShareError>) -> Result<ShareOutcome, ShareError> {
    match result {
        Err(ShareError::Cancelled) => Ok(ShareOutcome::Cancelled),
        Err(ShareError::Transport(message)) => match ShareError::from_platform_message(&message) {
            ShareError::Cancelled => Ok(ShareOutcome::Cancelled),
            err => Err(err),
        },
        other => other,
    }
}

/// Destination for generated documents
#[async_trait]
pub trait ShareTarget: Send + Sync {
    /// Hand one document to the target.
    async fn share(&self, request: &ShareRequest) -> Result<ShareOutcome, ShareError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Share target that accepts everything and does nothing
pub struct NoOpShareTarget;

#[async_trait]
impl ShareTarget for NoOpShareTarget {
    async fn share(&self, request: &ShareRequest) -> Result<ShareOutcome, ShareError> {
        tracing::debug!(
            title = %request.title,
            attachment = %request.attachment.display(),
            "Share skipped (no-op target)"
        );
        Ok(ShareOutcome::Shared)
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
