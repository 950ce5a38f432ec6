//! Commit log summarisation through a hosted language model.

pub mod openai;

pub use openai::OpenAiSummariser;

use crate::error::{DigestError, Result};

/// Turns a formatted commit log into prose.
///
/// Implementations fail with `Authentication` when credentials are missing
/// or rejected, and with `Summarization` for everything else.
pub trait Summariser {
    fn summarise(&self, commit_text: &str) -> Result<String>;
}

/// Stands in for a summariser that could not be set up, so the run still
/// writes its commit log and reports why the summary is missing.
pub struct UnavailableSummariser {
    reason: String,
}

impl UnavailableSummariser {
    pub fn new(cause: &DigestError) -> Self {
        Self {
            reason: cause.to_string(),
        }
    }
}

impl Summariser for UnavailableSummariser {
    fn summarise(&self, _commit_text: &str) -> Result<String> {
        Err(DigestError::Summarization(format!(
            "summariser is not configured: {}",
            self.reason
        )))
    }
}
