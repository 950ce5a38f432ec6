use anyhow::Result;
use commit_digest::cli::Cli;
use commit_digest::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);
    cli.load_env();
    cli.execute()
}
