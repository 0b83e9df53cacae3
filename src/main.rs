use clap::Parser;
use dotenvy::dotenv;
use std::process::ExitCode;
use storefront::{
    cli::{self, Cli},
    config::{self, Settings},
    core::Shop,
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn load_settings(cli: &Cli) -> Result<Settings> {
    match &cli.config {
        Some(path) => config::load_settings(path).map(config::settings::apply_env_overrides),
        None => config::load_default_settings(),
    }
}

fn open_shop(cli: &Cli) -> Result<Shop> {
    let settings = load_settings(cli)?;
    info!("Settings loaded, data directory {:?}", settings.data_dir);
    let store = config::open_store(&settings)?;
    Shop::open(store, settings)
}

fn main() -> ExitCode {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();

    let cli = Cli::parse();

    // 3. Open the shop and run the command
    let result = open_shop(&cli).and_then(|mut shop| {
        let stdout = std::io::stdout();
        cli::run(&cli, &mut shop, &mut stdout.lock())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}
