//! Terminal confirmation in front of a share target.

use async_trait::async_trait;
use handover_core::{ShareError, ShareOutcome, ShareRequest, ShareTarget};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

type Prompt = Arc<dyn Fn(&str) -> io::Result<String> + Send + Sync>;

fn ask_stdin(question: &str) -> io::Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{} [A/n] ", question)?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer)
}

/// Anything but an explicit "no" confirms.
pub fn is_confirmed(answer: &str) -> bool {
    !matches!(
        answer.trim().to_lowercase().as_str(),
        "n" | "ne" | "no"
    )
}

/// Asks before every share; a "no" is reported as a cancellation.
pub struct ConfirmShare {
    inner: Arc<dyn ShareTarget>,
    prompt: Prompt,
}

impl ConfirmShare {
    pub fn new(inner: Arc<dyn ShareTarget>) -> Self {
        Self::with_prompt(inner, ask_stdin)
    }

    pub fn with_prompt<F>(inner: Arc<dyn ShareTarget>, prompt: F) -> Self
    where
        F: Fn(&str) -> io::Result<String> + Send + Sync + 'static,
    {
        Self {
            inner,
            prompt: Arc::new(prompt),
        }
    }
}

#[async_trait]
impl ShareTarget for ConfirmShare {
    async fn share(&self, request: &ShareRequest) -> Result<ShareOutcome, ShareError> {
        let question = if request.recipients.is_empty() {
            format!("Sdílet \"{}\"?", request.title)
        } else {
            format!(
                "Sdílet \"{}\" ({})?",
                request.title,
                request.recipients.join(", ")
            )
        };

        let prompt = self.prompt.clone();
        let answer = tokio::task::spawn_blocking(move || prompt(&question))
            .await
            .map_err(|e| ShareError::Transport(format!("Prompt task failed: {}", e)))??;

        if !is_confirmed(&answer) {
            return Err(ShareError::Cancelled);
        }
        self.inner.share(request).await
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
