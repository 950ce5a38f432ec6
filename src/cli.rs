use crate::config::{self, Settings};
use crate::git::GitLog;
use crate::model::{RunOutcome, SummaryStatus};
use crate::pipeline;
use crate::summarise::{OpenAiSummariser, Summariser, UnavailableSummariser};
use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "commit-digest")]
#[command(about = "Extract git commit logs into timestamped reports, optionally summarised by a language model")]
#[command(version)]
pub struct Cli {
    #[arg(help = "Path to the git repository")]
    pub repository: PathBuf,

    #[arg(short, long = "author", value_name = "AUTHOR", help = "Only include commits by this author (repeatable)")]
    pub authors: Vec<String>,

    #[arg(short, long, alias = "summarize", help = "Summarise the extracted commit log with a language model")]
    pub summarise: bool,

    #[arg(long, help = "Directory reports are written under (overrides COMMIT_DIGEST_OUTPUT_DIR)")]
    pub output_dir: Option<PathBuf>,

    #[arg(long, help = "Model used for summaries (overrides COMMIT_DIGEST_MODEL)")]
    pub model: Option<String>,

    #[arg(long, help = "Load environment variables from this file instead of ./.env")]
    pub env_file: Option<PathBuf>,

    #[arg(short, long, conflicts_with = "quiet", help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(short, long, help = "Only log warnings and errors")]
    pub quiet: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        let settings = Settings::from_env()
            .with_model(self.model)
            .with_output_root(self.output_dir);

        let ctx = pipeline::prepare(&self.repository, self.authors, self.summarise)
            .context("Cannot read repository")?;

        let (settings, summariser) = if ctx.summarise {
            let (settings, summariser) = summariser_for(settings);
            (settings, Some(summariser))
        } else {
            (settings, None)
        };

        let outcome = pipeline::run(&ctx, &settings, &GitLog::new(), summariser.as_deref())
            .context("Failed to produce commit report")?;

        print_outcome(&outcome);
        Ok(())
    }

    /// Load the env file named on the command line, or `./.env` if present.
    ///
    /// A file that cannot be read only matters to the settings it would have
    /// provided, so the failure is logged and the run continues.
    pub fn load_env(&self) {
        if let Err(e) = config::load_env_file(self.env_file.as_deref()) {
            warn!("{e}");
        }
    }
}

/// Validate the summariser settings and build the client.
///
/// Failures never stop the run: the report is still written, with the cause
/// recorded where the summary would have been.
fn summariser_for(settings: Settings) -> (Settings, Box<dyn Summariser>) {
    let built = settings
        .clone()
        .summary_options_from_env()
        .and_then(|s| OpenAiSummariser::new(&s).map(|summariser| (s, summariser)));

    match built {
        Ok((settings, summariser)) => (settings, Box::new(summariser)),
        Err(e) => {
            warn!(error = %e, "summariser unavailable");
            (settings, Box::new(UnavailableSummariser::new(&e)))
        }
    }
}

fn print_outcome(outcome: &RunOutcome) {
    println!(
        "{} {} commit(s) written to {}",
        style("✔").green(),
        style(outcome.commit_count).cyan(),
        style(outcome.report_path.display()).bold()
    );
    match &outcome.summary {
        SummaryStatus::NotRequested => {}
        SummaryStatus::Written => println!("{} summary included", style("✔").green()),
        SummaryStatus::Unavailable(reason) => {
            eprintln!("{} summary unavailable: {}", style("!").yellow().bold(), reason);
        }
    }
}
