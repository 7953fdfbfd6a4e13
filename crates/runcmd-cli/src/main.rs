//! CLI entry point - the composition root.

use std::process::ExitCode;

use clap::Parser;
use runcmd_cli::{Cli, CliConfig, CliError, Commands, handlers};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::from_cli(&cli)?;

    match cli.command {
        Commands::Run { settings } => {
            handlers::run::execute(&config, &settings).await?;
        }
        Commands::Fetch { sources } => {
            for path in handlers::fetch::execute(&config, &sources).await? {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before clap reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            eprintln!("Error: {err}");
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
