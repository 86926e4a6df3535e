use anyhow::Context;
use clap::Parser;

mod cli;
mod commands;
mod context;
mod failure;
mod output;
mod ui;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();

    if let Err(error) = init_tracing(flags.quiet, flags.verbose) {
        eprintln!("regctl: {error:#}");
    }
    ui::init(&flags);

    if let Err(error) = run(cli.command, &flags).await {
        let code = failure::report(&error, flags.format);
        std::process::exit(code);
    }
}

async fn run(command: cli::Commands, flags: &cli::GlobalFlags) -> anyhow::Result<()> {
    let config = reg_config::RegistrarConfig::load_with_dotenv()?;
    let db_path = flags
        .db
        .clone()
        .unwrap_or_else(|| config.database.path.clone());

    let ctx = context::AppContext::init(&db_path, config, flags.principal.as_deref())
        .await
        .context("failed to initialize registrar context")?;

    commands::dispatch::dispatch(command, &ctx, flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("REGISTRAR_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
