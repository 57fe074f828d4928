use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{category::Category, model::QuoteSource};

use super::{ProviderQuote, QuoteProvider, join_url, truncate_body};

pub const MIN_LENGTH: u32 = 30;
pub const MAX_LENGTH: u32 = 200;

/// Primary quote provider: a random quote filtered by the category's tags.
#[derive(Debug, Clone)]
pub struct QuotableProvider {
    http: Client,
    base_url: String,
}

impl QuotableProvider {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QuotableResponse {
    content: String,
    author: String,
}

#[async_trait]
impl QuoteProvider for QuotableProvider {
    fn source(&self) -> QuoteSource {
        QuoteSource::Quotable
    }

    async fn random_quote(&self, category: Category) -> Result<ProviderQuote> {
        let url = join_url(&self.base_url, "random");
        let tags = category.quote_tags();
        debug!(%category, tags, "requesting quote from Quotable");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("tags", tags.to_string()),
                ("minLength", MIN_LENGTH.to_string()),
                ("maxLength", MAX_LENGTH.to_string()),
            ])
            .send()
            .await
            .context("Failed to send request to Quotable")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read Quotable response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Quotable request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: QuotableResponse =
            serde_json::from_str(&body).context("Failed to parse Quotable JSON")?;

        if parsed.content.trim().is_empty() {
            return Err(anyhow!("Quotable returned an empty quote"));
        }

        Ok(ProviderQuote {
            text: parsed.content,
            author: parsed.author,
        })
    }
}
