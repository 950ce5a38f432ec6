use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding tracing filter directives.
pub const LOG_ENV: &str = "COMMIT_DIGEST_LOG";

/// Install the global subscriber. Logs go to stderr so report paths on
/// stdout stay clean.
pub fn init(verbose: bool, quiet: bool) {
    let default = if verbose {
        LevelFilter::DEBUG
    } else if quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::INFO
    };

    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
