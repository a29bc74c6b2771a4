mod cli;

use clap::Parser;
use discharge_letter_lib::config;

fn main() -> anyhow::Result<()> {
    discharge_letter_lib::init_tracing();
    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);

    cli::Cli::parse().run()
}
