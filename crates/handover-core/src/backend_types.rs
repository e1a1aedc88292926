use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// How generated HTML is turned into the shared document
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// External HTML-to-PDF command (wkhtmltopdf compatible)
    Command,
    /// Keep the HTML file as the document
    Html,
}

impl FromStr for RendererKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "command" | "pdf" => Ok(RendererKind::Command),
            "html" => Ok(RendererKind::Html),
            _ => Err(anyhow::anyhow!("Invalid PDF renderer: {}", s)),
        }
    }
}

impl Display for RendererKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RendererKind::Command => write!(f, "command"),
            RendererKind::Html => write!(f, "html"),
        }
    }
}

/// Where finished documents are handed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareKind {
    Email,
    Directory,
    None,
}

impl FromStr for ShareKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "email" | "smtp" => Ok(ShareKind::Email),
            "directory" | "dir" | "outbox" => Ok(ShareKind::Directory),
            "none" => Ok(ShareKind::None),
            _ => Err(anyhow::anyhow!("Invalid share target: {}", s)),
        }
    }
}

impl Display for ShareKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ShareKind::Email => write!(f, "email"),
            ShareKind::Directory => write!(f, "directory"),
            ShareKind::None => write!(f, "none"),
        }
    }
}
