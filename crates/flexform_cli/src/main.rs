// flexform_cli/src/main.rs
use clap::{Parser, Subcommand};

use flexform_cli::commands;
use flexform_cli::config::Config;
use flexform_core::crypto::KeyManager;
use flexform_service::FlexFormService;
use flexform_store::SubmissionStore;

#[derive(Parser)]
#[command(name = "flexform_forge")]
#[command(about = "FLEX-FORM bulk import & export toolchain", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a legacy spreadsheet CSV export into the submission store
    Import(commands::import::ImportArgs),

    /// Export submissions to CSV, Excel or PDF
    Export(commands::export::ExportArgs),

    /// Validate a form schema JSON file without touching the store
    Validate(commands::validate::ValidateArgs),

    /// Probe the store connection and report the submission count
    Check(commands::check::CheckArgs),
}

fn build_service(config: &Config) -> Result<FlexFormService, Box<dyn std::error::Error>> {
    let store = SubmissionStore::new(&config.supabase_url, &config.service_key, &config.table)?;
    let keys = KeyManager::from_passphrase(&config.passphrase);
    Ok(FlexFormService::new(store, keys))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Import(args) => {
            // Fails fast if the environment is incomplete
            let config = Config::from_env()?;
            let service = build_service(&config)?;
            commands::import::execute(service, config, args).await?;
        }
        Commands::Export(args) => {
            let config = Config::from_env()?;
            let service = build_service(&config)?;
            commands::export::execute(service, config, args).await?;
        }
        Commands::Validate(args) => {
            // Note: Validate is pure logic, no store and no env needed.
            commands::validate::execute(args).await?;
        }
        Commands::Check(args) => {
            let config = Config::from_env()?;
            let service = build_service(&config)?;
            commands::check::execute(service, args).await?;
        }
    }

    Ok(())
}
