use chrono::{DateTime, FixedOffset, Local};
use std::path::PathBuf;

/// Format used for run directories and report file names.
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    pub author: String,
    pub timestamp: DateTime<FixedOffset>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct RunContext {
    pub repository_path: PathBuf,
    pub repository_name: String,
    pub run_timestamp: DateTime<Local>,
    pub author_filter: Vec<String>,
    pub summarise: bool,
}

impl RunContext {
    pub fn new(repository_path: PathBuf, repository_name: String) -> Self {
        Self {
            repository_path,
            repository_name,
            run_timestamp: Local::now(),
            author_filter: Vec::new(),
            summarise: false,
        }
    }

    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.author_filter = authors;
        self
    }

    pub fn with_summarise(mut self, summarise: bool) -> Self {
        self.summarise = summarise;
        self
    }

    pub fn with_timestamp(mut self, run_timestamp: DateTime<Local>) -> Self {
        self.run_timestamp = run_timestamp;
        self
    }

    pub fn timestamp_label(&self) -> String {
        self.run_timestamp.format(RUN_TIMESTAMP_FORMAT).to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub commit_text: String,
    pub summary_text: Option<String>,
    /// Why a requested summary is missing.
    pub summary_warning: Option<String>,
}

impl Report {
    pub fn new(commit_text: String) -> Self {
        Self {
            commit_text,
            summary_text: None,
            summary_warning: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryStatus {
    NotRequested,
    Written,
    Unavailable(String),
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report_path: PathBuf,
    pub commit_count: usize,
    pub summary: SummaryStatus,
}
