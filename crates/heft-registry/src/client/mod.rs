//! HTTP client with connection pooling and abortable, time-bounded requests

use std::time::Duration;

use reqwest::{header, Client, ClientBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;

use heft_core::error::HeftError;
use crate::RegistryResult;

/// Default per-request timeout
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(2000);

/// Why a single fetch produced no document.
///
/// Sources log these and map them to `Resolution::Unresolved`; they never
/// cross the resolver boundary.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("request cancelled")]
    Cancelled,

    #[error("upstream returned status {0}")]
    Status(StatusCode),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("failed to decode response body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Shared HTTP client for size sources
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Underlying HTTP client with connection pooling
    client: Client,
    /// Upper bound for one request, connect through body
    timeout: Duration,
}

impl HttpClient {
    /// Create a new client with the default 2 second timeout
    pub fn new() -> RegistryResult<Self> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout
    pub fn with_timeout(timeout: Duration) -> RegistryResult<Self> {
        let client = ClientBuilder::new()
            // Connection pooling configuration
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .gzip(true)
            .user_agent(concat!("heft/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HeftError::network("Failed to create HTTP client".to_string(), e))?;

        Ok(Self { client, timeout })
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` and decode a JSON body.
    ///
    /// The request future is dropped, and the connection aborted, as soon as
    /// the timeout elapses or `cancel` fires.
    pub async fn get_json<T>(&self, url: Url, cancel: &CancellationToken) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let request = async {
            let response = self
                .client
                .get(url)
                .header(header::ACCEPT, "application/json")
                .send()
                .await
                .map_err(FetchError::Request)?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status));
            }

            response.json::<T>().await.map_err(FetchError::Decode)
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(FetchError::Cancelled),
            result = tokio::time::timeout(self.timeout, request) => {
                result.unwrap_or(Err(FetchError::Timeout(self.timeout)))
            }
        }
    }
}
