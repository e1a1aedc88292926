use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

use crate::error::HandoverError;

/// Default header logo, used when `LOGO_TOP_RIGHT` is unset
pub const DEFAULT_LOGO_TOP_RIGHT: &[u8] = include_bytes!("../../assets/logo_top_right.png");

/// Default footer logo, used when `LOGO_BOTTOM_LEFT` is unset
pub const DEFAULT_LOGO_BOTTOM_LEFT: &[u8] = include_bytes!("../../assets/logo_bottom_left.png");

static IMAGE_DATA_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:image/[a-z0-9.+-]+;base64,[A-Za-z0-9+/]+={0,2}$")
        .expect("data URL pattern is valid")
});

/// Where a logo (or any other embedded image) comes from
///
/// Configuration strings are turned into a variant once, by [`AssetSource::parse`];
/// everything downstream matches on the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// Local file
    File(PathBuf),
    /// `http://` or `https://` URL
    Remote(String),
    /// Complete `data:image/*;base64,` URL, used verbatim
    Inline(String),
    /// Image compiled into the binary
    Bundled(&'static [u8]),
}

impl AssetSource {
    /// Classify a configured asset string. Blank input yields `None`.
    ///
    /// Inline sources end up unescaped in an `src` attribute, so anything but
    /// a well-formed base64 image data URL is rejected.
    pub fn parse(raw: &str) -> Result<Option<Self>, HandoverError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        let source = if raw.starts_with("data:") {
            if !IMAGE_DATA_URL_RE.is_match(raw) {
                return Err(HandoverError::Config(
                    "inline asset must be a data:image/*;base64, URL".to_string(),
                ));
            }
            AssetSource::Inline(raw.to_string())
        } else if raw.starts_with("http://") || raw.starts_with("https://") {
            AssetSource::Remote(raw.to_string())
        } else if let Some(path) = raw.strip_prefix("file://") {
            AssetSource::File(PathBuf::from(path))
        } else {
            AssetSource::File(PathBuf::from(raw))
        };
        Ok(Some(source))
    }

    /// Short description for logs
    pub fn describe(&self) -> String {
        match self {
            AssetSource::File(path) => format!("file:{}", path.display()),
            AssetSource::Remote(url) => format!("remote:{}", url),
            AssetSource::Inline(_) => "inline".to_string(),
            AssetSource::Bundled(bytes) => format!("bundled:{}b", bytes.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert_eq!(
            AssetSource::parse("data:image/png;base64,AAAA").unwrap(),
            Some(AssetSource::Inline("data:image/png;base64,AAAA".to_string()))
        );
        assert_eq!(
            AssetSource::parse("https://example.com/logo.png").unwrap(),
            Some(AssetSource::Remote("https://example.com/logo.png".to_string()))
        );
        assert_eq!(
            AssetSource::parse("file:///srv/logo.png").unwrap(),
            Some(AssetSource::File(PathBuf::from("/srv/logo.png")))
        );
        assert_eq!(
            AssetSource::parse("assets/logo.png").unwrap(),
            Some(AssetSource::File(PathBuf::from("assets/logo.png")))
        );
        assert_eq!(AssetSource::parse("  ").unwrap(), None);
    }

    #[test]
    fn test_malformed_inline_rejected() {
        for raw in [
            "data:image/png;base64,AAAA\" onerror=\"alert(1)",
            "data:text/html;base64,AAAA",
            "data:image/svg+xml,<svg/>",
            "data:image/png;base64,",
        ] {
            assert!(
                matches!(AssetSource::parse(raw), Err(HandoverError::Config(_))),
                "{}",
                raw
            );
        }
        assert!(AssetSource::parse("data:image/svg+xml;base64,PHN2Zy8+").is_ok());
    }

    #[test]
    fn test_default_logos_are_png() {
        for logo in [DEFAULT_LOGO_TOP_RIGHT, DEFAULT_LOGO_BOTTOM_LEFT] {
            assert!(logo.starts_with(&[0x89, b'P', b'N', b'G']));
        }
    }
}
