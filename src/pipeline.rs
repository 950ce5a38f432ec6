//! The straight-line run: extract, format, optionally summarise, write.

use crate::config::Settings;
use crate::error::Result;
use crate::git::{CommitSource, GitRepo};
use crate::model::{Report, RunContext, RunOutcome, SummaryStatus};
use crate::report::{format_commits, render_report, ReportWriter};
use crate::summarise::Summariser;
use std::path::Path;
use tracing::{info, warn};

/// Validate the repository and build the context for one run.
pub fn prepare(repository: &Path, authors: Vec<String>, summarise: bool) -> Result<RunContext> {
    let repo = GitRepo::open(repository)?;
    Ok(RunContext::new(repo.path().to_path_buf(), repo.name().to_string())
        .with_authors(authors)
        .with_summarise(summarise))
}

/// Execute a run.
///
/// Summarisation failures are logged and recorded in the report; every other
/// error ends the run before the report file is created.
pub fn run(
    ctx: &RunContext,
    settings: &Settings,
    source: &dyn CommitSource,
    summariser: Option<&dyn Summariser>,
) -> Result<RunOutcome> {
    let commits = source.list_commits(&ctx.repository_path, &ctx.author_filter)?;
    info!(
        repository = %ctx.repository_name,
        commits = commits.len(),
        authors = ?ctx.author_filter,
        "commits extracted"
    );

    let mut report = Report::new(format_commits(
        &ctx.repository_path.display().to_string(),
        &commits,
    ));

    let summary = if ctx.summarise {
        summarise_into(&mut report, summariser)?
    } else {
        SummaryStatus::NotRequested
    };

    let body = render_report(&ctx.timestamp_label(), &report, settings);
    let report_path = ReportWriter::new(&settings.output_root).write(ctx, &body)?;
    info!(path = %report_path.display(), "report written");

    Ok(RunOutcome {
        report_path,
        commit_count: commits.len(),
        summary,
    })
}

fn summarise_into(report: &mut Report, summariser: Option<&dyn Summariser>) -> Result<SummaryStatus> {
    let Some(summariser) = summariser else {
        let reason = "no summariser is configured".to_string();
        warn!("{reason}; writing the commit log only");
        report.summary_warning = Some(reason.clone());
        return Ok(SummaryStatus::Unavailable(reason));
    };

    match summariser.summarise(&report.commit_text) {
        Ok(text) => {
            report.summary_text = Some(text);
            Ok(SummaryStatus::Written)
        }
        Err(e) if !e.is_fatal() => {
            warn!(error = %e, "summary unavailable; writing the commit log only");
            let reason = e.to_string();
            report.summary_warning = Some(reason.clone());
            Ok(SummaryStatus::Unavailable(reason))
        }
        Err(e) => Err(e),
    }
}
