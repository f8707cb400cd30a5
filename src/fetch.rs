use std::time::Duration;

use anyhow::Context as _;
use reqwest::header::{ACCEPT, USER_AGENT};
use url::Url;

use crate::config::ScrapeConfig;

/// Source of documentation pages addressed by query parameters.
///
/// A `None` result means "page unavailable"; implementations log the cause.
pub trait PageSource {
    fn fetch(&self, params: &[(&str, String)]) -> Option<String>;
}

pub struct HttpPageSource {
    client: reqwest::blocking::Client,
    base_url: Url,
    user_agent: String,
    delay: Duration,
}

impl HttpPageSource {
    pub fn new(config: &ScrapeConfig) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build http client")?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
            delay: config.delay,
        })
    }

    fn get(&self, params: &[(&str, String)]) -> anyhow::Result<String> {
        let response = self
            .client
            .get(self.base_url.clone())
            .query(params)
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .with_context(|| format!("GET {}", self.base_url))?
            .error_for_status()
            .with_context(|| format!("GET {}", self.base_url))?;

        response.text().context("read response body")
    }
}

impl PageSource for HttpPageSource {
    fn fetch(&self, params: &[(&str, String)]) -> Option<String> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        match self.get(params) {
            Ok(body) => Some(body),
            Err(err) => {
                tracing::warn!(url = %self.base_url, ?params, "fetch failed: {err:#}");
                None
            }
        }
    }
}
