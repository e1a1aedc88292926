//! Outbox directory share target
//!
//! Each shared document is copied into the outbox next to a JSON manifest
//! (`<file>.json`) carrying the title, subject, message and recipients, for a
//! separate process to pick up.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use handover_core::{HandoverError, ShareError, ShareOutcome, ShareRequest, ShareTarget};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareManifest {
    pub title: String,
    pub subject: String,
    pub message: String,
    pub recipients: Vec<String>,
    /// File name of the copied document inside the outbox
    pub attachment: String,
    pub shared_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct DirectoryShare {
    outbox: PathBuf,
}

impl DirectoryShare {
    /// Create the target, creating the outbox directory if needed.
    pub async fn new(outbox: impl Into<PathBuf>) -> Result<Self, HandoverError> {
        let outbox = outbox.into();

        fs::create_dir_all(&outbox).await.map_err(|e| {
            HandoverError::Config(format!(
                "Failed to create outbox directory {}: {}",
                outbox.display(),
                e
            ))
        })?;

        Ok(Self { outbox })
    }

    pub fn outbox(&self) -> &Path {
        &self.outbox
    }
}

#[async_trait]
impl ShareTarget for DirectoryShare {
    async fn share(&self, request: &ShareRequest) -> Result<ShareOutcome, ShareError> {
        let file_name = request
            .attachment
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ShareError::Attachment(format!("No file name in {}", request.attachment.display()))
            })?;

        let source = fs::canonicalize(&request.attachment).await.map_err(|e| {
            ShareError::Attachment(format!("{}: {}", request.attachment.display(), e))
        })?;
        let target = self.outbox.join(file_name);

        // Copying a file onto itself truncates it
        let already_in_outbox = matches!(fs::canonicalize(&target).await, Ok(t) if t == source);
        if !already_in_outbox {
            fs::copy(&source, &target).await.map_err(|e| {
                ShareError::Attachment(format!("{}: {}", request.attachment.display(), e))
            })?;
        }

        let manifest = ShareManifest {
            title: request.title.clone(),
            subject: request.subject.clone(),
            message: request.message.clone(),
            recipients: request.recipients.clone(),
            attachment: file_name.to_string(),
            shared_at: Utc::now(),
        };
        let json = serde_json::to_vec_pretty(&manifest)
            .map_err(|e| ShareError::Transport(format!("Failed to encode manifest: {}", e)))?;
        fs::write(self.outbox.join(format!("{}.json", file_name)), json).await?;

        tracing::info!(
            title = %request.title,
            outbox = %self.outbox.display(),
            file = %file_name,
            "Document placed in outbox"
        );
        Ok(ShareOutcome::Shared)
    }

    fn name(&self) -> &'static str {
        "directory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_copies_document_and_writes_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let document = dir.path().join("souhrn_predani_Novak_Jan.pdf");
        std::fs::write(&document, b"%PDF-1.4 summary").unwrap();

        let share = DirectoryShare::new(dir.path().join("outbox")).await.unwrap();
        let request = ShareRequest {
            title: "Souhrn předání vozidla - Novák".to_string(),
            subject: "Souhrn předání vozidla - Novák".to_string(),
            message: "Souhrn předání vozidla k ekologické likvidaci".to_string(),
            attachment: document,
            recipients: vec!["jan@example.cz".to_string()],
        };

        let outcome = share.share(&request).await.unwrap();
        assert_eq!(outcome, ShareOutcome::Shared);

        let copied = share.outbox().join("souhrn_predani_Novak_Jan.pdf");
        assert_eq!(std::fs::read(&copied).unwrap(), b"%PDF-1.4 summary");

        let manifest: ShareManifest = serde_json::from_slice(
            &std::fs::read(share.outbox().join("souhrn_predani_Novak_Jan.pdf.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(manifest.title, "Souhrn předání vozidla - Novák");
        assert_eq!(manifest.recipients, vec!["jan@example.cz".to_string()]);
        assert_eq!(manifest.attachment, "souhrn_predani_Novak_Jan.pdf");
    }

    #[tokio::test]
    async fn test_document_already_in_outbox_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let document = dir.path().join("predavaci_protokol_Novak_Jan.pdf");
        std::fs::write(&document, b"%PDF-1.4 handover protocol").unwrap();

        // Same directory reached through a different spelling
        let share = DirectoryShare::new(dir.path().join(".")).await.unwrap();
        let request = ShareRequest {
            title: "Předávací protokol - Novák".to_string(),
            subject: "Předávací protokol - Novák".to_string(),
            message: "Předávací protokol".to_string(),
            attachment: document.clone(),
            recipients: vec!["kancelar@example.cz".to_string()],
        };

        assert_eq!(share.share(&request).await.unwrap(), ShareOutcome::Shared);
        assert_eq!(
            std::fs::read(&document).unwrap(),
            b"%PDF-1.4 handover protocol"
        );
        assert!(dir
            .path()
            .join("predavaci_protokol_Novak_Jan.pdf.json")
            .is_file());
    }

    #[tokio::test]
    async fn test_missing_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let share = DirectoryShare::new(dir.path()).await.unwrap();
        let request = ShareRequest {
            title: "t".to_string(),
            subject: "t".to_string(),
            message: "m".to_string(),
            attachment: dir.path().join("missing.pdf"),
            recipients: vec![],
        };
        let err = share.share(&request).await.unwrap_err();
        assert!(matches!(err, ShareError::Attachment(_)));
        assert!(!err.is_cancellation());
    }
}
