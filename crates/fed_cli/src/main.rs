use clap::Parser;
use fed_core::Result;
use fed_scrapers::cli::{handle_command, ScraperArgs, ScraperCommands};
use fed_scrapers::init_logging;
use tracing::error;

#[derive(Parser, Debug)]
#[command(author, version, about = "Download Federal Reserve speech transcripts", long_about = None)]
pub struct Cli {
    /// Log every step, not just phase changes
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: ScraperCommands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let args = ScraperArgs {
        command: cli.command,
    };
    if let Err(e) = handle_command(args).await {
        error!("❌ {}", e);
        return Err(e);
    }
    Ok(())
}
