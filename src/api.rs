// Remote sports API: the `SportsApi` trait seam plus the reqwest-backed HTTP
// implementation.
//
// The orchestrator only ever talks to `dyn SportsApi`, so tests can swap in
// an in-memory implementation without a server.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::ApiConfig;
use crate::sport::Sport;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned status {0}")]
    Status(reqwest::StatusCode),

    /// The body did not decode as the expected shape. This is also where a
    /// sport identifier outside the closed set surfaces: serde rejects it
    /// before it can reach any lookup table.
    #[error("failed to decode response body: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// SportsApi trait
// ---------------------------------------------------------------------------

/// The four operations this client consumes. Request/response shapes are the
/// server's concern; both mutations echo the sport back.
#[async_trait]
pub trait SportsApi: Send + Sync {
    async fn list_all_sports(&self) -> Result<Vec<Sport>, ApiError>;
    async fn list_user_sports(&self) -> Result<Vec<Sport>, ApiError>;
    async fn add_sport(&self, sport: Sport) -> Result<Sport, ApiError>;
    async fn delete_sport(&self, sport: Sport) -> Result<Sport, ApiError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// Body for the mutation endpoints; the server echoes the same shape back.
#[derive(Debug, Serialize, Deserialize)]
struct SportBody {
    sport: Sport,
}

pub struct HttpSportsApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSportsApi {
    /// Build a client from config. The configured timeout applies to every
    /// request; there is no retry policy beyond the transport's.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(HttpSportsApi {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// GET a JSON array of sports from `path`.
    async fn get_sports(&self, path: &str) -> Result<Vec<Sport>, ApiError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        decode_body(response).await
    }
}

/// Check the status and decode the body as `T`, reading the text first so
/// decode failures carry the serde message rather than a bare transport
/// error.
async fn decode_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status));
    }
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl SportsApi for HttpSportsApi {
    async fn list_all_sports(&self) -> Result<Vec<Sport>, ApiError> {
        self.get_sports("sports").await
    }

    async fn list_user_sports(&self) -> Result<Vec<Sport>, ApiError> {
        self.get_sports("user/sports").await
    }

    async fn add_sport(&self, sport: Sport) -> Result<Sport, ApiError> {
        let url = self.url("user/sports");
        debug!(%url, %sport, "POST");
        let response = self
            .http
            .post(&url)
            .json(&SportBody { sport })
            .send()
            .await?;
        let body: SportBody = decode_body(response).await?;
        Ok(body.sport)
    }

    async fn delete_sport(&self, sport: Sport) -> Result<Sport, ApiError> {
        let url = self.url(&format!("user/sports/{sport}"));
        debug!(%url, "DELETE");
        let response = self.http.delete(&url).send().await?;
        let body: SportBody = decode_body(response).await?;
        Ok(body.sport)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
