//! Configuration module
//!
//! Every setting comes from the environment (after loading `.env`) and has a
//! default, so the CLI runs without any configuration at all.

use std::env;
use std::path::{Path, PathBuf};

use crate::backend_types::{RendererKind, ShareKind};
use crate::constants::{
    DEFAULT_CURRENCY, DEFAULT_PHOTO_BUDGET_BYTES, DEFAULT_PHOTO_DIMENSIONS,
    DEFAULT_PHOTO_QUALITIES, DEFAULT_QR_SIZE_PX,
};
use crate::models::{
    AssetSource, PhotoSlot, DEFAULT_LOGO_BOTTOM_LEFT, DEFAULT_LOGO_TOP_RIGHT,
};

const DEFAULT_OUTPUT_DIR: &str = "./handover-out";
const DEFAULT_OUTBOX_DIR: &str = "./handover-out/outbox";
const DEFAULT_PDF_COMMAND: &str = "wkhtmltopdf";
const DEFAULT_SMTP_PORT: u16 = 587;

/// Limits of the photo-budget compressor
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhotoBudgetConfig {
    pub budget_bytes: u64,
    /// Longest-edge targets, tried in order
    pub dimensions: Vec<u32>,
    /// JPEG qualities, tried in order for each dimension
    pub qualities: Vec<u8>,
    /// Photos dropped, in order, when re-encoding cannot meet the budget
    pub removal_order: Vec<PhotoSlot>,
}

impl Default for PhotoBudgetConfig {
    fn default() -> Self {
        Self {
            budget_bytes: DEFAULT_PHOTO_BUDGET_BYTES,
            dimensions: DEFAULT_PHOTO_DIMENSIONS.to_vec(),
            qualities: DEFAULT_PHOTO_QUALITIES.to_vec(),
            removal_order: vec![PhotoSlot::TitleBack, PhotoSlot::Interior],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
    pub tls: bool,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_SMTP_PORT,
            user: None,
            password: None,
            from: None,
            tls: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct HandoverConfig {
    pub photo: PhotoBudgetConfig,
    pub qr_size_px: u32,
    pub payment_currency: String,
    /// `None` when disabled with `none`
    pub logo_top_right: Option<AssetSource>,
    pub logo_bottom_left: Option<AssetSource>,
    pub output_dir: PathBuf,
    pub pdf_renderer: RendererKind,
    pub pdf_renderer_command: String,
    pub share_target: ShareKind,
    pub share_outbox_dir: PathBuf,
    /// Receive the handover protocol
    pub office_recipients: Vec<String>,
    pub smtp: SmtpConfig,
}

impl Default for HandoverConfig {
    fn default() -> Self {
        Self {
            photo: PhotoBudgetConfig::default(),
            qr_size_px: DEFAULT_QR_SIZE_PX,
            payment_currency: DEFAULT_CURRENCY.to_string(),
            logo_top_right: Some(AssetSource::Bundled(DEFAULT_LOGO_TOP_RIGHT)),
            logo_bottom_left: Some(AssetSource::Bundled(DEFAULT_LOGO_BOTTOM_LEFT)),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            pdf_renderer: RendererKind::Command,
            pdf_renderer_command: DEFAULT_PDF_COMMAND.to_string(),
            share_target: ShareKind::Directory,
            share_outbox_dir: PathBuf::from(DEFAULT_OUTBOX_DIR),
            office_recipients: Vec::new(),
            smtp: SmtpConfig::default(),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug, Default)]
pub struct Config(pub Box<HandoverConfig>);

impl Config {
    fn as_handover(&self) -> &HandoverConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = HandoverConfig::from_lookup(|key| env::var(key).ok())?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_handover().validate()
    }

    pub fn photo_budget(&self) -> &PhotoBudgetConfig {
        &self.as_handover().photo
    }

    pub fn qr_size_px(&self) -> u32 {
        self.as_handover().qr_size_px
    }

    pub fn payment_currency(&self) -> &str {
        &self.as_handover().payment_currency
    }

    pub fn logo_top_right(&self) -> Option<&AssetSource> {
        self.as_handover().logo_top_right.as_ref()
    }

    pub fn logo_bottom_left(&self) -> Option<&AssetSource> {
        self.as_handover().logo_bottom_left.as_ref()
    }

    pub fn output_dir(&self) -> &Path {
        &self.as_handover().output_dir
    }

    pub fn pdf_renderer(&self) -> RendererKind {
        self.as_handover().pdf_renderer
    }

    pub fn pdf_renderer_command(&self) -> &str {
        &self.as_handover().pdf_renderer_command
    }

    pub fn share_target(&self) -> ShareKind {
        self.as_handover().share_target
    }

    pub fn share_outbox_dir(&self) -> &Path {
        &self.as_handover().share_outbox_dir
    }

    pub fn office_recipients(&self) -> &[String] {
        &self.as_handover().office_recipients
    }

    pub fn smtp(&self) -> &SmtpConfig {
        &self.as_handover().smtp
    }
}

fn parse_list<T: std::str::FromStr>(raw: &str, name: &str) -> Result<Vec<T>, anyhow::Error> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<T>()
                .map_err(|_| anyhow::anyhow!("{} contains an invalid entry: {}", name, s))
        })
        .collect()
}

fn parse_value<T: std::str::FromStr>(
    raw: Option<String>,
    name: &str,
    default: T,
) -> Result<T, anyhow::Error> {
    match raw {
        Some(raw) => raw
            .trim()
            .to_lowercase()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{} has an invalid value: {}", name, raw)),
        None => Ok(default),
    }
}

/// Unset keeps the bundled logo, `none` disables it.
fn parse_logo(
    raw: Option<String>,
    name: &str,
    bundled: &'static [u8],
) -> Result<Option<AssetSource>, anyhow::Error> {
    match raw {
        None => Ok(Some(AssetSource::Bundled(bundled))),
        Some(raw) if raw.trim().eq_ignore_ascii_case("none") => Ok(None),
        Some(raw) => AssetSource::parse(&raw).map_err(|e| anyhow::anyhow!("{}: {}", name, e)),
    }
}

impl HandoverConfig {
    /// Build the configuration from a key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = HandoverConfig::default();
        let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let photo = PhotoBudgetConfig {
            budget_bytes: parse_value(
                var("PHOTO_BUDGET_BYTES"),
                "PHOTO_BUDGET_BYTES",
                DEFAULT_PHOTO_BUDGET_BYTES,
            )?,
            dimensions: match var("PHOTO_DIMENSIONS") {
                Some(raw) => parse_list(&raw, "PHOTO_DIMENSIONS")?,
                None => defaults.photo.dimensions.clone(),
            },
            qualities: match var("PHOTO_QUALITIES") {
                Some(raw) => parse_list(&raw, "PHOTO_QUALITIES")?,
                None => defaults.photo.qualities.clone(),
            },
            removal_order: match var("PHOTO_REMOVAL_ORDER") {
                Some(raw) => parse_list(&raw, "PHOTO_REMOVAL_ORDER")?,
                None => defaults.photo.removal_order.clone(),
            },
        };

        let pdf_renderer = match var("PDF_RENDERER") {
            Some(raw) => raw.trim().parse::<RendererKind>()?,
            None => defaults.pdf_renderer,
        };

        let share_target = match var("SHARE_TARGET") {
            Some(raw) => raw.trim().parse::<ShareKind>()?,
            None => defaults.share_target,
        };

        let office_recipients = var("OFFICE_RECIPIENTS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let smtp = SmtpConfig {
            host: var("SMTP_HOST"),
            port: parse_value(var("SMTP_PORT"), "SMTP_PORT", DEFAULT_SMTP_PORT)?,
            user: var("SMTP_USER"),
            password: var("SMTP_PASSWORD"),
            from: var("SMTP_FROM"),
            tls: parse_value(var("SMTP_TLS"), "SMTP_TLS", true)?,
        };

        let config = HandoverConfig {
            photo,
            qr_size_px: parse_value(var("QR_SIZE_PX"), "QR_SIZE_PX", DEFAULT_QR_SIZE_PX)?,
            payment_currency: var("PAYMENT_CURRENCY")
                .map(|s| s.trim().to_uppercase())
                .unwrap_or(defaults.payment_currency),
            logo_top_right: parse_logo(
                var("LOGO_TOP_RIGHT"),
                "LOGO_TOP_RIGHT",
                DEFAULT_LOGO_TOP_RIGHT,
            )?,
            logo_bottom_left: parse_logo(
                var("LOGO_BOTTOM_LEFT"),
                "LOGO_BOTTOM_LEFT",
                DEFAULT_LOGO_BOTTOM_LEFT,
            )?,
            output_dir: var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            pdf_renderer,
            pdf_renderer_command: var("PDF_RENDERER_COMMAND")
                .unwrap_or(defaults.pdf_renderer_command),
            share_target,
            share_outbox_dir: var("SHARE_OUTBOX_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.share_outbox_dir),
            office_recipients,
            smtp,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.photo.budget_bytes == 0 {
            return Err(anyhow::anyhow!("PHOTO_BUDGET_BYTES must be greater than 0"));
        }

        if self.photo.dimensions.is_empty() || self.photo.dimensions.contains(&0) {
            return Err(anyhow::anyhow!(
                "PHOTO_DIMENSIONS must list at least one positive dimension"
            ));
        }

        if self.photo.qualities.is_empty()
            || self.photo.qualities.iter().any(|&q| q == 0 || q > 100)
        {
            return Err(anyhow::anyhow!(
                "PHOTO_QUALITIES must list qualities between 1 and 100"
            ));
        }

        if self.qr_size_px == 0 {
            return Err(anyhow::anyhow!("QR_SIZE_PX must be greater than 0"));
        }

        if self.payment_currency.len() != 3
            || !self
                .payment_currency
                .chars()
                .all(|c| c.is_ascii_uppercase())
        {
            return Err(anyhow::anyhow!(
                "PAYMENT_CURRENCY must be a three-letter ISO code"
            ));
        }

        if self.pdf_renderer == RendererKind::Command && self.pdf_renderer_command.trim().is_empty()
        {
            return Err(anyhow::anyhow!(
                "PDF_RENDERER_COMMAND must be set when using the command renderer"
            ));
        }

        if self.share_target == ShareKind::Email
            && (self.smtp.host.is_none() || self.smtp.from.is_none())
        {
            return Err(anyhow::anyhow!(
                "SHARE_TARGET=email requires SMTP_HOST and SMTP_FROM to be set"
            ));
        }

        if self.share_target == ShareKind::Email && self.office_recipients.is_empty() {
            return Err(anyhow::anyhow!(
                "SHARE_TARGET=email requires OFFICE_RECIPIENTS for the handover protocol"
            ));
        }

        if self.smtp.port == 0 {
            return Err(anyhow::anyhow!("SMTP_PORT must be greater than 0"));
        }

        Ok(())
    }
}
