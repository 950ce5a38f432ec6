use thiserror::Error;

pub type Result<T> = std::result::Result<T, DigestError>;

#[derive(Error, Debug)]
pub enum DigestError {
    #[error("Repository not found: '{path}' does not appear to be a git repository")]
    RepositoryNotFound { path: String },
    #[error("Failed to extract commits: {0}")]
    Extraction(String),
    #[error("Authentication error: {0}")]
    Authentication(String),
    #[error("Summarization error: {0}")]
    Summarization(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DigestError {
    /// Fatal errors abort the run; the rest only cost the summary.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            DigestError::Authentication(_) | DigestError::Summarization(_)
        )
    }
}

impl From<reqwest::Error> for DigestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DigestError::Summarization(format!("request timed out: {err}"))
        } else {
            DigestError::Summarization(err.to_string())
        }
    }
}
