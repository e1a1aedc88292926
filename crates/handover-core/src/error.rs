//! Error types module
//!
//! Every failure of the handover flow is unified under [`HandoverError`]. The
//! [`ErrorMetadata`] trait lets each variant describe how it is presented: a
//! validation problem blocks the wizard with a specific message, anything else
//! is surfaced once as a generic failure.

use std::io;

use crate::hooks::ShareError;
use crate::payment::PaymentError;

/// Message shown for any failure that is not caused by user input.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Nepodařilo se vytvořit nebo sdílet dokumenty. Zkuste to znovu a ověřte, že máte povolená oprávnění k úložišti.";

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors such as validation failures
    Debug,
    /// Recoverable issues
    Warn,
    /// Unexpected failures
    Error,
}

/// Metadata describing how an error is presented to the person running the wizard
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g. "VALIDATION_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether the wizard must stay on the current stage until the input is fixed
    fn is_blocking(&self) -> bool;

    /// Message suitable for the user (Czech)
    fn user_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum HandoverError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Payment payload error: {0}")]
    Payment(#[from] PaymentError),

    #[error("Missing photos: {0}")]
    MissingPhotos(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Asset error: {0}")]
    Asset(String),

    #[error("Document render error: {0}")]
    Render(String),

    #[error("Share failed: {0}")]
    Share(#[from] ShareError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl HandoverError {
    /// Build a validation error naming the offending fields.
    pub fn invalid_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = fields.into_iter().map(|f| f.as_ref().to_string()).collect();
        HandoverError::Validation(names.join(", "))
    }

    /// Get the error type name
    pub fn error_type(&self) -> &'static str {
        match self {
            HandoverError::Validation(_) => "Validation",
            HandoverError::InvalidInput(_) => "InvalidInput",
            HandoverError::Payment(_) => "Payment",
            HandoverError::MissingPhotos(_) => "MissingPhotos",
            HandoverError::ImageProcessing(_) => "ImageProcessing",
            HandoverError::Asset(_) => "Asset",
            HandoverError::Render(_) => "Render",
            HandoverError::Share(_) => "Share",
            HandoverError::Config(_) => "Config",
            HandoverError::Internal(_) => "Internal",
            HandoverError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl From<anyhow::Error> for HandoverError {
    fn from(err: anyhow::Error) -> Self {
        HandoverError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for HandoverError {
    fn from(err: io::Error) -> Self {
        HandoverError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for HandoverError {
    fn from(err: serde_json::Error) -> Self {
        HandoverError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for HandoverError {
    fn from(err: validator::ValidationErrors) -> Self {
        HandoverError::invalid_fields(crate::validation::invalid_field_names(&err))
    }
}

/// Static metadata for each variant: (error_code, blocking, log_level).
fn handover_error_static_metadata(err: &HandoverError) -> (&'static str, bool, LogLevel) {
    match err {
        HandoverError::Validation(_) => ("VALIDATION_ERROR", true, LogLevel::Debug),
        HandoverError::InvalidInput(_) => ("INVALID_INPUT", true, LogLevel::Debug),
        HandoverError::Payment(_) => ("PAYMENT_PAYLOAD_ERROR", true, LogLevel::Debug),
        HandoverError::MissingPhotos(_) => ("MISSING_PHOTOS", true, LogLevel::Debug),
        HandoverError::ImageProcessing(_) => ("IMAGE_PROCESSING_ERROR", false, LogLevel::Warn),
        HandoverError::Asset(_) => ("ASSET_ERROR", false, LogLevel::Warn),
        HandoverError::Render(_) => ("RENDER_ERROR", false, LogLevel::Error),
        HandoverError::Share(_) => ("SHARE_ERROR", false, LogLevel::Error),
        HandoverError::Config(_) => ("CONFIG_ERROR", false, LogLevel::Error),
        HandoverError::Internal(_) => ("INTERNAL_ERROR", false, LogLevel::Error),
        HandoverError::InternalWithSource { .. } => ("INTERNAL_ERROR", false, LogLevel::Error),
    }
}

impl ErrorMetadata for HandoverError {
    fn error_code(&self) -> &'static str {
        handover_error_static_metadata(self).0
    }

    fn is_blocking(&self) -> bool {
        handover_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        handover_error_static_metadata(self).2
    }

    fn user_message(&self) -> String {
        match self {
            HandoverError::Validation(ref fields) => {
                format!("Vyplňte všechna povinná pole správně ({}).", fields)
            }
            HandoverError::InvalidInput(ref msg) => msg.clone(),
            HandoverError::Payment(ref err) => format!("QR platbu nelze sestavit: {}", err),
            HandoverError::MissingPhotos(_) => "Nahrajte prosím všechny fotografie.".to_string(),
            HandoverError::Share(_) => "Sdílení dokumentu selhalo.".to_string(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}
