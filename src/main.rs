use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    fs25docs::logging::init().context("init logging")?;

    let cli = fs25docs::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    fs25docs::scrape::run(cli.scrape).context("scrape")?;

    Ok(())
}
