use clap::Parser;

use crate::config::{
    DEFAULT_BASE_URL, DEFAULT_DELAY_MS, DEFAULT_OUT_DIR, DEFAULT_TIMEOUT_SECS, DEFAULT_TITLE,
};

/// Mirror the FS25 scripting documentation into a local Markdown archive.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub scrape: ScrapeArgs,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ScrapeArgs {
    /// Documentation entry point (must be http/https).
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Output directory for documents, `manifest.json` and `INDEX.md`.
    #[arg(long, default_value = DEFAULT_OUT_DIR)]
    pub out: String,

    /// Delay before each request (politeness).
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    /// Per-request timeout.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Title used for the `INDEX.md` heading.
    #[arg(long, default_value = DEFAULT_TITLE)]
    pub title: String,
}
