use clap::Parser;
use rough_router::cli::{run_cli, Cli};
use rough_router::logging::{init_logging, LogConfig};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig {
        log_level: cli.log_level.clone(),
        ..LogConfig::from_env()
    };
    init_logging(&log_config)?;

    run_cli(&cli)
}
