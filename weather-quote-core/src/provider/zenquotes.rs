use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{category::Category, model::QuoteSource};

use super::{ProviderQuote, QuoteProvider, join_url, truncate_body};

/// Secondary quote provider. ZenQuotes has no tag filter, so the category
/// is ignored.
#[derive(Debug, Clone)]
pub struct ZenQuotesProvider {
    http: Client,
    base_url: String,
}

impl ZenQuotesProvider {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ZqEntry {
    q: String,
    a: String,
}

#[async_trait]
impl QuoteProvider for ZenQuotesProvider {
    fn source(&self) -> QuoteSource {
        QuoteSource::ZenQuotes
    }

    async fn random_quote(&self, _category: Category) -> Result<ProviderQuote> {
        let url = join_url(&self.base_url, "api/random");
        debug!("requesting quote from ZenQuotes");

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to send request to ZenQuotes")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read ZenQuotes response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "ZenQuotes request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: Vec<ZqEntry> =
            serde_json::from_str(&body).context("Failed to parse ZenQuotes JSON")?;

        let entry = parsed
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("ZenQuotes response contained no quotes"))?;

        if entry.q.trim().is_empty() {
            return Err(anyhow!("ZenQuotes returned an empty quote"));
        }

        Ok(ProviderQuote {
            text: entry.q,
            author: entry.a,
        })
    }
}
