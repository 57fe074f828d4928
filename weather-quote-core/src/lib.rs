//! Core library for the `weather-quote` service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Weather and quote providers behind async traits
//! - Condition classification, quote tags and built-in fallback quotes
//! - The orchestration that turns a location into a weather + quote result
//!
//! It is used by `weather-quote-cli`, but can also be embedded in other
//! binaries or services.

pub mod category;
pub mod config;
pub mod error;
pub mod fallback;
pub mod model;
pub mod provider;
pub mod quote;
pub mod service;
pub mod weather;

pub use category::{Category, classify};
pub use config::{Config, ProviderConfig};
pub use error::Error;
pub use model::{
    CombinedResult, Coordinates, Quote, QuoteRefresh, QuoteSource, WeatherReading, WeatherRequest,
    WeatherSource, WeatherSummary,
};
pub use provider::{ProviderId, QuoteProvider, WeatherProvider};
pub use quote::QuoteLookup;
pub use service::WeatherQuoteService;
pub use weather::WeatherLookup;
