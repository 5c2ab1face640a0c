use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use myco_cli::cli::{Cli, Commands};
use myco_cli::commands;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "myco_cli=info,myco_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("myco error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let database_url = cli
        .database_url
        .context("DATABASE_URL must be set or --database-url given")?;

    let pool = myco_db::create_pool(&database_url)
        .await
        .context("failed to connect to database")?;
    myco_db::run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    let code = match cli.command {
        Commands::ImportSpecies(args) => {
            commands::import::run(&pool, &args).await?;
            ExitCode::SUCCESS
        }
        Commands::CheckOrphans => {
            let orphans = commands::orphans::run(&pool).await?;
            if orphans > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Commands::GenerateFindings(args) => {
            commands::demo::run(&pool, &args).await?;
            ExitCode::SUCCESS
        }
        Commands::GrantAdmin(args) => {
            commands::admin::grant(&pool, &args.email).await?;
            ExitCode::SUCCESS
        }
    };

    pool.close().await;
    Ok(code)
}
