//! domus - main entry point

use clap::Parser;
use domus::cli::{cmd_predict, cmd_serve, cmd_train, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "domus=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            data,
            output,
            stratify,
            test_fraction,
            cv_folds,
            seed,
        } => {
            cmd_train(&data, &output, &stratify, test_fraction, cv_folds, seed)?;
        }
        Commands::Serve {
            artifact,
            host,
            port,
        } => {
            cmd_serve(&artifact, &host, port).await?;
        }
        Commands::Predict { artifact } => {
            cmd_predict(&artifact)?;
        }
    }

    Ok(())
}
