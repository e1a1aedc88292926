use handover_core::{Config, HandoverError, NoOpShareTarget, ShareKind, ShareTarget};
use std::sync::Arc;

use crate::{DirectoryShare, EmailShare};

/// Create the share target selected by `SHARE_TARGET`.
pub async fn create_share_target(config: &Config) -> Result<Arc<dyn ShareTarget>, HandoverError> {
    match config.share_target() {
        ShareKind::Email => Ok(Arc::new(EmailShare::from_config(config)?)),
        ShareKind::Directory => {
            let share = DirectoryShare::new(config.share_outbox_dir()).await?;
            Ok(Arc::new(share))
        }
        ShareKind::None => Ok(Arc::new(NoOpShareTarget)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handover_core::HandoverConfig;

    fn config(kind: ShareKind, outbox: &std::path::Path) -> Config {
        let mut inner = HandoverConfig::default();
        inner.share_target = kind;
        inner.share_outbox_dir = outbox.to_path_buf();
        Config(Box::new(inner))
    }

    #[tokio::test]
    async fn test_factory_selects_target() {
        let dir = tempfile::tempdir().unwrap();
        let outbox = dir.path().join("outbox");

        let target = create_share_target(&config(ShareKind::Directory, &outbox))
            .await
            .unwrap();
        assert_eq!(target.name(), "directory");
        assert!(outbox.is_dir());

        let target = create_share_target(&config(ShareKind::None, &outbox))
            .await
            .unwrap();
        assert_eq!(target.name(), "none");
    }

    #[tokio::test]
    async fn test_email_without_smtp_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = create_share_target(&config(ShareKind::Email, dir.path())).await;
        assert!(matches!(result, Err(HandoverError::Config(_))));
    }
}
