use crate::error::Result;
use crate::model::RunContext;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Lays out and writes report files under an output root.
///
/// Layout: `<root>/<repo>/run_<repo>_<timestamp>/commit_report_<timestamp>_<repo>.txt`.
pub struct ReportWriter {
    root: PathBuf,
}

impl ReportWriter {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn run_dir(&self, ctx: &RunContext) -> PathBuf {
        let name = &ctx.repository_name;
        self.root
            .join(name)
            .join(format!("run_{name}_{}", ctx.timestamp_label()))
    }

    pub fn report_path(&self, ctx: &RunContext) -> PathBuf {
        self.run_dir(ctx).join(format!(
            "commit_report_{}_{}.txt",
            ctx.timestamp_label(),
            ctx.repository_name
        ))
    }

    /// Create the run directory if needed and write `contents` to the report file.
    pub fn write(&self, ctx: &RunContext, contents: &str) -> Result<PathBuf> {
        let dir = self.run_dir(ctx);
        fs::create_dir_all(&dir)?;
        let path = self.report_path(ctx);
        fs::write(&path, contents)?;
        debug!(path = %path.display(), bytes = contents.len(), "report written");
        Ok(path)
    }
}
