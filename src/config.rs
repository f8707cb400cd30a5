use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use url::Url;

use crate::cli::ScrapeArgs;

pub const DEFAULT_BASE_URL: &str =
    "https://gdn.giants-software.com/documentation_scripting_fs25.php";
pub const DEFAULT_OUT_DIR: &str = "output";
pub const DEFAULT_DELAY_MS: u64 = 500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TITLE: &str = "FS25 Documentation";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: Url,
    pub out_dir: PathBuf,
    pub delay: Duration,
    pub timeout: Duration,
    pub user_agent: String,
    pub title: String,
}

impl ScrapeConfig {
    pub fn from_args(args: &ScrapeArgs) -> anyhow::Result<Self> {
        let base_url = Url::parse(&args.base_url).context("parse --base-url")?;
        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            anyhow::bail!("--base-url must be http/https: {base_url}");
        }

        let user_agent = std::env::var("FS25DOCS_USER_AGENT")
            .ok()
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

        Ok(Self {
            base_url,
            out_dir: PathBuf::from(&args.out),
            delay: Duration::from_millis(args.delay_ms),
            timeout: Duration::from_secs(args.timeout_secs),
            user_agent,
            title: args.title.clone(),
        })
    }
}
