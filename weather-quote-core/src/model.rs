use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Latitude/longitude pair used for coordinate-mode lookups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherRequest {
    pub city: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl WeatherRequest {
    pub fn city(city: impl Into<String>) -> Self {
        Self::from_parts(Some(city.into()), None, None)
    }

    /// Build a request from loosely-typed inputs.
    ///
    /// Coordinate mode is only active when both `lat` and `lon` are present
    /// and finite. A blank city is treated as absent.
    pub fn from_parts(city: Option<String>, lat: Option<f64>, lon: Option<f64>) -> Self {
        let city = city
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        let coordinates = match (lat, lon) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(Coordinates { lat, lon })
            }
            _ => None,
        };

        Self { city, coordinates }
    }

    /// Resolve what to ask the provider for: coordinates win over a city
    /// name, and `default_city` covers a request naming neither.
    pub fn location(&self, default_city: &str) -> Location {
        match (&self.coordinates, &self.city) {
            (Some(coords), _) => Location::Coordinates(*coords),
            (None, Some(city)) => Location::City(city.clone()),
            (None, None) => Location::City(default_city.to_string()),
        }
    }

    /// Name to show when no provider answered.
    pub fn display_name<'a>(&'a self, default_city: &'a str) -> &'a str {
        self.city.as_deref().unwrap_or(default_city)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    City(String),
    Coordinates(Coordinates),
}

/// Where a [`WeatherReading`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherSource {
    /// Fetched from the weather provider.
    Live,
    /// Placeholder because no provider credential is configured.
    Unconfigured,
    /// Placeholder because the provider call failed.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub location_name: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    /// Provider vocabulary, e.g. "Rain" or "Clear".
    pub condition_main: String,
    pub condition_description: String,
    pub source: WeatherSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteSource {
    Quotable,
    ZenQuotes,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
    pub source: QuoteSource,
}

/// The weather half of a [`CombinedResult`], with temperatures rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSummary {
    pub location: String,
    pub temperature: i64,
    pub feels_like: i64,
    pub condition: String,
    pub description: String,
    pub category: Category,
    pub source: WeatherSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedResult {
    pub weather: WeatherSummary,
    pub quote: Quote,
    pub timestamp: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRefresh {
    pub quote: Quote,
    pub timestamp: String,
}
