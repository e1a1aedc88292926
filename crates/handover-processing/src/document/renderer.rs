use async_trait::async_trait;
use handover_core::{Config, HandoverError, RendererKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::process::Command;

use crate::traits::PdfRenderer;

async fn ensure_dir(dir: &Path) -> Result<(), HandoverError> {
    fs::create_dir_all(dir).await.map_err(|e| {
        HandoverError::Render(format!(
            "Failed to create output directory {}: {}",
            dir.display(),
            e
        ))
    })
}

/// Keeps the HTML as the shared document
pub struct HtmlFileRenderer {
    output_dir: PathBuf,
}

impl HtmlFileRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl PdfRenderer for HtmlFileRenderer {
    async fn render(&self, html: &str, file_stem: &str) -> Result<PathBuf, HandoverError> {
        ensure_dir(&self.output_dir).await?;
        let path = self.output_dir.join(format!("{}.html", file_stem));
        fs::write(&path, html).await.map_err(|e| {
            HandoverError::Render(format!("Failed to write {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "HTML document written");
        Ok(path)
    }

    fn name(&self) -> &'static str {
        "html"
    }
}

/// Runs an external HTML to PDF converter (`<command> --quiet <in.html> <out.pdf>`)
pub struct CommandPdfRenderer {
    command: String,
    output_dir: PathBuf,
}

impl CommandPdfRenderer {
    pub fn new(command: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl PdfRenderer for CommandPdfRenderer {
    async fn render(&self, html: &str, file_stem: &str) -> Result<PathBuf, HandoverError> {
        ensure_dir(&self.output_dir).await?;

        let input = tempfile::Builder::new()
            .prefix(file_stem)
            .suffix(".html")
            .tempfile()
            .map_err(|e| HandoverError::Render(format!("Failed to create temp file: {}", e)))?;
        fs::write(input.path(), html)
            .await
            .map_err(|e| HandoverError::Render(format!("Failed to write temp HTML: {}", e)))?;

        let output = self.output_dir.join(format!("{}.pdf", file_stem));

        tracing::debug!(
            command = %self.command,
            output = %output.display(),
            "Rendering PDF"
        );

        let result = Command::new(&self.command)
            .arg("--quiet")
            .arg(input.path())
            .arg(&output)
            .output()
            .await
            .map_err(|e| {
                HandoverError::Render(format!("Failed to run '{}': {}", self.command, e))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(HandoverError::Render(format!(
                "'{}' exited with {}: {}",
                self.command,
                result.status,
                stderr.trim()
            )));
        }

        Ok(output)
    }

    fn name(&self) -> &'static str {
        "command"
    }
}

/// Renderer selected by `PDF_RENDERER`, writing into `OUTPUT_DIR`.
pub fn create_renderer(config: &Config) -> Arc<dyn PdfRenderer> {
    match config.pdf_renderer() {
        RendererKind::Command => Arc::new(CommandPdfRenderer::new(
            config.pdf_renderer_command(),
            config.output_dir(),
        )),
        RendererKind::Html => Arc::new(HtmlFileRenderer::new(config.output_dir())),
    }
}
