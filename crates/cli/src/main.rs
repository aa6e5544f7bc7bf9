use clap::Parser;

use demandcast_cli::cli::Cli;
use demandcast_forecast::Settings;
use demandcast_observability::LogFormat;

fn main() -> anyhow::Result<()> {
    demandcast_observability::init_with(LogFormat::from_env_or(LogFormat::Pretty));

    let cli = Cli::parse();
    demandcast_cli::commands::run(cli, Settings::from_env())
}
