use super::Summariser;
use crate::config::{Settings, ENV_API_KEY};
use crate::error::{DigestError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

const ERROR_SNIPPET_LEN: usize = 300;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// [`Summariser`] for OpenAI-compatible chat completion endpoints.
pub struct OpenAiSummariser {
    client: Client,
    settings: Settings,
    show_progress: bool,
}

impl OpenAiSummariser {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| DigestError::Summarization(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(settings, client))
    }

    /// Use a preconfigured HTTP client. The settings timeout is not applied.
    pub fn with_client(settings: &Settings, client: Client) -> Self {
        Self {
            client,
            settings: settings.clone(),
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.api_base.trim_end_matches('/'))
    }

    fn spinner(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Summarising with {}...", self.settings.model));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    fn request(&self, api_key: &str, commit_text: &str) -> Result<String> {
        let user_prompt = self.settings.render_user_prompt(commit_text);
        let body = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.settings.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        let url = self.endpoint();
        debug!(%url, model = %self.settings.model, "sending completion request");
        let resp = self.client.post(&url).bearer_auth(api_key).json(&body).send()?;

        let status = resp.status();
        if !status.is_success() {
            let detail = error_detail(&resp.text().unwrap_or_default());
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    DigestError::Authentication(format!("API rejected the key ({status}): {detail}"))
                }
                _ => DigestError::Summarization(format!("API returned {status}: {detail}")),
            });
        }

        let parsed: ChatResponse = resp
            .json()
            .map_err(|e| DigestError::Summarization(format!("malformed completion response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| DigestError::Summarization("response contained no completion".to_string()))
    }
}

impl Summariser for OpenAiSummariser {
    fn summarise(&self, commit_text: &str) -> Result<String> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or_else(|| DigestError::Authentication(format!("{ENV_API_KEY} is not set")))?;

        let pb = self.spinner();
        let result = self.request(api_key, commit_text);
        pb.finish_and_clear();

        if let Ok(summary) = &result {
            info!(chars = summary.len(), "summary received");
        }
        result
    }
}

/// Pull a readable message out of an error body.
fn error_detail(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }
    let trimmed = body.trim();
    if trimmed.chars().count() > ERROR_SNIPPET_LEN {
        let cut: String = trimmed.chars().take(ERROR_SNIPPET_LEN).collect();
        format!("{cut}...")
    } else {
        trimmed.to_string()
    }
}
