use anyhow::Result;
use clap::Parser;
use minutary::cli::{
    handle_config_command, handle_process_command, handle_record_command, run_interactive, Cli,
    CliCommand,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("Minutary {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(CliCommand::Record(args)) => handle_record_command(args).await,
        Some(CliCommand::Process(args)) => handle_process_command(args).await,
        Some(CliCommand::Config(args)) => handle_config_command(args),
        None => run_interactive().await,
    }
}
