use tracing::{info, instrument, warn};

use crate::{
    model::{WeatherReading, WeatherRequest, WeatherSource},
    provider::WeatherProvider,
};

const PLACEHOLDER_TEMP_C: f64 = 20.0;
const PLACEHOLDER_FEELS_LIKE_C: f64 = 22.0;

/// Current-weather lookup that always yields a usable reading.
///
/// Without a provider every lookup returns a "Rain" placeholder; when the
/// provider fails the failure is logged and a "Clear" placeholder is
/// returned instead. The reading's `source` tells the three cases apart.
#[derive(Debug)]
pub struct WeatherLookup {
    provider: Option<Box<dyn WeatherProvider>>,
    default_city: String,
}

impl WeatherLookup {
    pub fn new(provider: Option<Box<dyn WeatherProvider>>, default_city: impl Into<String>) -> Self {
        Self {
            provider,
            default_city: default_city.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    #[instrument(skip(self, request), fields(city = ?request.city, coords = ?request.coordinates))]
    pub async fn lookup(&self, request: &WeatherRequest) -> WeatherReading {
        let name = request.display_name(&self.default_city);

        let Some(provider) = &self.provider else {
            info!("no weather API key configured, using placeholder reading");
            return placeholder(name, "Rain", "rain", WeatherSource::Unconfigured);
        };

        let location = request.location(&self.default_city);
        match provider.current_weather(&location).await {
            Ok(reading) => reading,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "weather lookup failed, using placeholder reading");
                placeholder(name, "Clear", "clear sky", WeatherSource::Unavailable)
            }
        }
    }
}

fn placeholder(name: &str, main: &str, description: &str, source: WeatherSource) -> WeatherReading {
    WeatherReading {
        location_name: name.to_string(),
        temperature_c: PLACEHOLDER_TEMP_C,
        feels_like_c: PLACEHOLDER_FEELS_LIKE_C,
        condition_main: main.to_string(),
        condition_description: description.to_string(),
        source,
    }
}
