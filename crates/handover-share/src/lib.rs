//! Handover Share Library
//!
//! Share targets for the finished documents: an SMTP e-mail sender and an
//! outbox directory. The pipeline only sees `handover_core::ShareTarget`.

pub mod directory;
pub mod email;
pub mod factory;

pub use directory::{DirectoryShare, ShareManifest};
pub use email::EmailShare;
pub use factory::create_share_target;
