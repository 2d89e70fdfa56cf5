//! Masal CLI binary.
//!
//! Generates a story into a directory and manages the local story quota.

use clap::Parser;
use masal::{JsonFileStore, MasalConfig, QuotaLedger};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, generate_story, redeem_promo, show_quota};

    // Load .env so GEMINI_API_KEY can live there
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    #[cfg(feature = "observability")]
    let provider = masal::observability::init_observability(
        masal::observability::ObservabilityConfig::default().verbose(cli.verbose),
    );
    #[cfg(not(feature = "observability"))]
    masal::init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => MasalConfig::from_file(path)?,
        None => MasalConfig::load()?,
    };

    let store_path = cli.store.clone().unwrap_or_else(JsonFileStore::default_path);
    let ledger = QuotaLedger::new(JsonFileStore::open(store_path)?, config.quota.clone());

    let result = match cli.command {
        Commands::Generate(args) => generate_story(args, &config, ledger).await,
        Commands::Quota => show_quota(&ledger),
        Commands::Promo { code } => redeem_promo(&ledger, &code),
    };

    #[cfg(feature = "observability")]
    masal::observability::shutdown_observability(provider);

    result?;
    Ok(())
}
