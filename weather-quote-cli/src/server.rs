//! HTTP interface: the combined weather + quote endpoint and the quote refresh.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use weather_quote_core::{CombinedResult, Error, QuoteRefresh, WeatherQuoteService, WeatherRequest};

const COMBINED_FAILURE: &str = "A server error occurred.";
const REFRESH_FAILURE: &str = "An error occurred while fetching a quote.";

#[derive(Debug, Clone)]
pub struct AppState {
    service: Arc<WeatherQuoteService>,
}

pub fn create_router(service: Arc<WeatherQuoteService>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/weather-quote",
            get(get_weather_quote).post(refresh_quote),
        )
        .with_state(AppState { service })
}

pub async fn serve(service: WeatherQuoteService, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(Arc::new(service));
    let listener = TcpListener::bind(addr).await?;

    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}

/// Error body: `error` always, `message` only for internal failures.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal { summary: &'static str, detail: String },
}

impl ApiError {
    fn from_core(err: Error, summary: &'static str) -> Self {
        match err {
            Error::InvalidInput(msg) => Self::BadRequest(msg),
            Error::Unexpected(detail) => Self::Internal { summary, detail },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: msg,
                    message: None,
                },
            ),
            Self::Internal { summary, detail } => {
                error!(detail = %detail, "{summary}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: summary.to_string(),
                        message: Some(detail),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub weather_configured: bool,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        weather_configured: state.service.weather_configured(),
    })
}

/// Raw query parameters. `lat`/`lon` are kept as strings so a malformed
/// number drops back to city mode instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct WeatherQuoteParams {
    pub city: Option<String>,
    pub lat: Option<String>,
    pub lon: Option<String>,
}

impl WeatherQuoteParams {
    fn into_request(self) -> WeatherRequest {
        WeatherRequest::from_parts(self.city, parse_coord(self.lat), parse_coord(self.lon))
    }
}

fn parse_coord(raw: Option<String>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok()
}

async fn get_weather_quote(
    State(state): State<AppState>,
    Query(params): Query<WeatherQuoteParams>,
) -> Result<Json<CombinedResult>, ApiError> {
    let request = params.into_request();

    state
        .service
        .fetch_combined(&request)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, COMBINED_FAILURE))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRefreshRequest {
    pub weather_category: Option<String>,
}

/// The body is parsed by hand so a missing content type is tolerated; an
/// unparseable body is reported as an internal failure.
async fn refresh_quote(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<QuoteRefresh>, ApiError> {
    let payload: QuoteRefreshRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::Internal {
            summary: REFRESH_FAILURE,
            detail: e.to_string(),
        })?;

    state
        .service
        .fetch_quote_only(payload.weather_category.as_deref())
        .await
        .map(Json)
        .map_err(|e| ApiError::from_core(e, REFRESH_FAILURE))
}
