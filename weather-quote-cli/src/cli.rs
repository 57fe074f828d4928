use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use weather_quote_core::{
    CombinedResult, Config, ProviderId, Quote, WeatherQuoteService, WeatherRequest,
};

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-quote", version, about = "Weather-matched quotes")]
pub struct Cli {
    /// Read and write this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials or endpoints for a specific provider.
    Configure {
        /// Provider short name: "openweather", "quotable" or "zenquotes".
        provider: String,
    },

    /// Show current weather and a matching quote.
    Show {
        /// City name; defaults to the configured default city.
        city: Option<String>,

        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Print the raw JSON result.
        #[arg(long)]
        json: bool,
    },

    /// Fetch a fresh quote for a known weather category.
    Quote {
        /// One of rain, snow, clear, clouds, thunderstorm, fog, default.
        category: String,

        #[arg(long)]
        json: bool,
    },

    /// Serve the HTTP API.
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.load_config()?;

        match self.command {
            Command::Configure { provider } => {
                let id = ProviderId::try_from(provider.as_str())?;
                configure(config, id, self.config.as_deref())?;
            }
            Command::Show { city, lat, lon, json } => {
                let service = WeatherQuoteService::from_config(&config)?;
                let result = service
                    .fetch_combined(&WeatherRequest::from_parts(city, lat, lon))
                    .await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    print_combined(&result);
                }
            }
            Command::Quote { category, json } => {
                let service = WeatherQuoteService::from_config(&config)?;
                let refresh = service.fetch_quote_only(Some(category.as_str())).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&refresh)?);
                } else {
                    print_quote(&refresh.quote);
                }
            }
            Command::Serve { addr } => {
                if !config.is_provider_configured(ProviderId::OpenWeather) {
                    tracing::warn!(
                        "no OpenWeather API key configured; weather will be a placeholder. \
                         Set {} or run `weather-quote configure openweather`.",
                        weather_quote_core::config::API_KEY_ENV
                    );
                }
                let service = WeatherQuoteService::from_config(&config)?;
                server::serve(service, addr).await?;
            }
        }

        Ok(())
    }

    /// File config, plus `WEATHER_API_KEY` for commands that call providers.
    /// `configure` writes the result back, so it only ever sees the file.
    fn load_config(&self) -> anyhow::Result<Config> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        if self.command.uses_env_overrides() {
            Ok(config.with_env_overrides())
        } else {
            Ok(config)
        }
    }
}

impl Command {
    fn uses_env_overrides(&self) -> bool {
        !matches!(self, Command::Configure { .. })
    }
}

fn configure(
    mut config: Config,
    id: ProviderId,
    path: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    if id.requires_api_key() {
        let key = Password::new(&format!("{id} API key:"))
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?;
        config.upsert_provider_api_key(id, key.trim().to_string());

        let city = Text::new("Default city:")
            .with_default(&config.default_city)
            .prompt()
            .context("Failed to read default city")?;
        config.default_city = city.trim().to_string();
    }

    let base_url = Text::new(&format!("{id} base URL:"))
        .with_default(config.provider_base_url(id))
        .prompt()
        .context("Failed to read base URL")?;
    if base_url.trim() != id.default_base_url() {
        config.set_provider_base_url(id, base_url.trim().to_string());
    }

    match path {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }

    println!("Saved configuration for {id}.");
    Ok(())
}

fn print_combined(result: &CombinedResult) {
    let w = &result.weather;
    println!("{}", result.message);
    println!(
        "📍 {}: {}°C (feels like {}°C), {} [{}]",
        w.location, w.temperature, w.feels_like, w.description, w.category
    );
    if let Ok(ts) = DateTime::parse_from_rfc3339(&result.timestamp) {
        println!("🕒 {}", ts.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
    }
    print_quote(&result.quote);
}

fn print_quote(quote: &Quote) {
    println!();
    println!("  \"{}\"", quote.text);
    println!("      - {} ({})", quote.author, source_label(quote));
}

fn source_label(quote: &Quote) -> &'static str {
    match quote.source {
        weather_quote_core::QuoteSource::Quotable => "via Quotable",
        weather_quote_core::QuoteSource::ZenQuotes => "via ZenQuotes",
        weather_quote_core::QuoteSource::Fallback => "built-in",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use weather_quote_core::config::API_KEY_ENV;

    #[test]
    fn parses_show_with_coordinates() {
        let cli = Cli::parse_from(["weather-quote", "show", "--lat", "37.5", "--lon", "-122.4"]);
        match cli.command {
            Command::Show { city, lat, lon, json } => {
                assert_eq!(city, None);
                assert_eq!(lat, Some(37.5));
                assert_eq!(lon, Some(-122.4));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn nan_latitude_drops_to_city_mode() {
        let cli = Cli::parse_from(["weather-quote", "show", "--lat", "NaN", "--lon", "1"]);
        match cli.command {
            Command::Show { city, lat, lon, .. } => {
                let request = WeatherRequest::from_parts(city, lat, lon);
                assert_eq!(request.coordinates, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_serve_default_addr() {
        let cli = Cli::parse_from(["weather-quote", "serve"]);
        match cli.command {
            Command::Serve { addr } => assert_eq!(addr.port(), 3000),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_config_flag() {
        let cli = Cli::parse_from(["weather-quote", "quote", "snow", "--config", "/tmp/wq.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/wq.toml")));
    }

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn configure_never_saves_env_api_key() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = std::env::temp_dir().join(format!("weather-quote-cli-{}", std::process::id()));
        let path = dir.join("config.toml");
        let path_arg = path.to_str().unwrap();

        // SAFETY: ENV_LOCK serializes every test touching the environment.
        unsafe { std::env::set_var(API_KEY_ENV, "SECRET_FROM_ENV") };

        let cli = Cli::parse_from(["weather-quote", "--config", path_arg, "configure", "zenquotes"]);
        let mut config = cli.load_config().unwrap();
        assert_eq!(config.provider_api_key(ProviderId::OpenWeather), None);
        config.set_provider_base_url(ProviderId::ZenQuotes, "http://localhost:9".into());
        config.save_to(&path).unwrap();

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(!saved.contains("SECRET_FROM_ENV"));
        assert!(saved.contains("http://localhost:9"));

        let cli = Cli::parse_from(["weather-quote", "--config", path_arg, "show"]);
        let config = cli.load_config().unwrap();
        assert_eq!(
            config.provider_api_key(ProviderId::OpenWeather),
            Some("SECRET_FROM_ENV")
        );

        unsafe { std::env::remove_var(API_KEY_ENV) };
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn source_labels() {
        let quote = weather_quote_core::fallback::fallback_quote(weather_quote_core::Category::Rain);
        assert_eq!(source_label(&quote), "built-in");
    }
}
