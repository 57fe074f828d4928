use tracing::{debug, instrument, warn};

use crate::{
    category::Category,
    fallback::fallback_quote,
    model::Quote,
    provider::QuoteProvider,
};

/// Quote lookup over an ordered provider chain.
///
/// Providers are tried one after another, each at most once. The first
/// success wins; if all fail the built-in quote for the category is used.
#[derive(Debug)]
pub struct QuoteLookup {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl QuoteLookup {
    pub fn new(providers: Vec<Box<dyn QuoteProvider>>) -> Self {
        Self { providers }
    }

    #[instrument(skip(self), fields(%category))]
    pub async fn lookup(&self, category: Category) -> Quote {
        for provider in &self.providers {
            let source = provider.source();
            match provider.random_quote(category).await {
                Ok(found) => {
                    debug!(?source, "quote provider succeeded");
                    return Quote {
                        text: found.text,
                        author: found.author,
                        source,
                    };
                }
                Err(err) => {
                    warn!(?source, error = %format!("{err:#}"), "quote provider failed");
                }
            }
        }

        debug!("all quote providers failed, using built-in quote");
        fallback_quote(category)
    }
}
