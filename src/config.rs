//! Run configuration.
//!
//! Settings are read once, from the process environment after an optional
//! `.env` file has been loaded, and handed to the pipeline explicitly.

use crate::error::{DigestError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_MODEL: &str = "gpt-4-turbo";
pub const DEFAULT_OUTPUT_DIR: &str = "commit_reports";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Placeholder in the user prompt that receives the formatted commit log.
pub const COMMIT_TEXT_PLACEHOLDER: &str = "{commit_text}";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert software engineer and technical communicator. \
Your task is to analyse a series of git commit logs and generate a clear, concise, and insightful summary. \
Focus on extracting the major changes, key improvements, and any recurring themes. \
If multiple repositories or dates are included, group the insights accordingly. \
Avoid unnecessary low-level details, and ensure the summary is actionable for both technical and business audiences.";

pub const DEFAULT_USER_PROMPT: &str = "Please summarise the following commit logs:\n\n{commit_text}\n\n\
The summary should include an overall overview and a bullet-point list of key changes, \
highlighting new features, bug fixes, refactorings, and any breaking changes.";

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_MODEL: &str = "COMMIT_DIGEST_MODEL";
pub const ENV_OUTPUT_DIR: &str = "COMMIT_DIGEST_OUTPUT_DIR";
pub const ENV_API_BASE: &str = "COMMIT_DIGEST_API_BASE";
pub const ENV_TIMEOUT: &str = "COMMIT_DIGEST_TIMEOUT";
pub const ENV_TEMPERATURE: &str = "COMMIT_DIGEST_TEMPERATURE";
pub const ENV_MAX_TOKENS: &str = "COMMIT_DIGEST_MAX_TOKENS";
pub const ENV_SYSTEM_PROMPT: &str = "COMMIT_DIGEST_SYSTEM_PROMPT";
pub const ENV_USER_PROMPT: &str = "COMMIT_DIGEST_USER_PROMPT";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub output_root: PathBuf,
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_DIR),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            user_prompt: DEFAULT_USER_PROMPT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Settings {
    /// Build settings from the current process environment.
    ///
    /// Only string settings are read here. Numeric summariser options are
    /// parsed by [`Settings::summary_options_from_env`], so a plain
    /// extraction run never fails on them.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_blank(&lookup, key);
        let mut settings = Settings::default();

        settings.api_key = get(ENV_API_KEY).map(|v| v.trim().to_string());
        if let Some(model) = get(ENV_MODEL) {
            settings.model = model;
        }
        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            settings.output_root = PathBuf::from(dir);
        }
        if let Some(base) = get(ENV_API_BASE) {
            settings.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(prompt) = get(ENV_SYSTEM_PROMPT) {
            settings.system_prompt = prompt;
        }
        if let Some(prompt) = get(ENV_USER_PROMPT) {
            settings.user_prompt = prompt;
        }

        settings
    }

    /// Parse and validate the options only the summariser needs.
    pub fn summary_options_from_env(self) -> Result<Self> {
        self.with_summary_options(|key| std::env::var(key).ok())
    }

    pub fn with_summary_options<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_blank(&lookup, key);

        if let Some(raw) = get(ENV_TIMEOUT) {
            self.timeout = humantime::parse_duration(raw.trim()).map_err(|e| {
                DigestError::Config(format!("{ENV_TIMEOUT}='{raw}' is not a duration: {e}"))
            })?;
        }
        if let Some(raw) = get(ENV_TEMPERATURE) {
            self.temperature = raw.trim().parse().map_err(|e| {
                DigestError::Config(format!("{ENV_TEMPERATURE}='{raw}' is not a number: {e}"))
            })?;
        }
        if let Some(raw) = get(ENV_MAX_TOKENS) {
            self.max_tokens = raw.trim().parse().map_err(|e| {
                DigestError::Config(format!("{ENV_MAX_TOKENS}='{raw}' is not an integer: {e}"))
            })?;
        }

        if !self.user_prompt.contains(COMMIT_TEXT_PLACEHOLDER) {
            return Err(DigestError::Config(format!(
                "{ENV_USER_PROMPT} must contain the {COMMIT_TEXT_PLACEHOLDER} placeholder"
            )));
        }

        Ok(self)
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        if let Some(m) = model {
            self.model = m;
        }
        self
    }

    pub fn with_output_root(mut self, root: Option<PathBuf>) -> Self {
        if let Some(r) = root {
            self.output_root = r;
        }
        self
    }

    /// Render the user prompt for the given commit log.
    pub fn render_user_prompt(&self, commit_text: &str) -> String {
        self.user_prompt.replace(COMMIT_TEXT_PLACEHOLDER, commit_text)
    }
}

fn non_blank<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Load a `.env` file into the process environment.
///
/// Variables already set in the process win. A missing default `.env` is
/// not an error; a missing explicitly requested file is.
pub fn load_env_file(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            dotenvy::from_path(p).map_err(|e| {
                DigestError::Config(format!("Failed to load env file {}: {e}", p.display()))
            })?;
            debug!(path = %p.display(), "loaded env file");
        }
        None => match dotenvy::dotenv() {
            Ok(p) => debug!(path = %p.display(), "loaded env file"),
            Err(e) if e.not_found() => debug!("no .env file found"),
            Err(e) => return Err(DigestError::Config(format!("Failed to load .env: {e}"))),
        },
    }
    Ok(())
}
