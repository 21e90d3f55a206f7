use anyhow::Result;
use clap::Parser;
use file_replace::cli;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli_args = cli::Cli::parse();
    cli::errors::ensure_output_supported(cli_args.format)?;
    let payload = cli::run_command(cli_args.config, cli_args.command).await?;
    cli::output::emit_value(&payload, cli_args.format, cli_args.compact, cli_args.quiet)?;
    Ok(())
}
