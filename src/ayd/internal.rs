//! Internal HTTP client implementation for Ayd

use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::report::{LogQuery, LogResponse, Record, Report};
use super::Backend;

/// Failures talking to Ayd
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Request(#[source] reqwest::Error),

    #[error("Ayd returned status {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error("{0}")]
    Decode(String),

    #[error("invalid endpoint {path}: {source}")]
    Endpoint {
        path: String,
        #[source]
        source: url::ParseError,
    },
}

impl BackendError {
    /// True when the body arrived but could not be decoded
    pub fn is_decode(&self) -> bool {
        matches!(self, BackendError::Decode(_))
    }
}

/// Ayd client
pub struct Client {
    base_url: Url,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, BackendError> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(BackendError::Request)?;

        Ok(Self { base_url, http })
    }

    /// Resolve an absolute endpoint path against the base URL
    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|source| BackendError::Endpoint {
                path: path.to_string(),
                source,
            })
    }

    fn get(&self, url: Url) -> Result<Response, BackendError> {
        debug!(%url, "GET");
        let response = self
            .http
            .get(url.clone())
            .send()
            .map_err(BackendError::Request)?;

        if !response.status().is_success() {
            return Err(BackendError::Status {
                status: response.status(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, BackendError> {
        let body = self.get(url)?.bytes().map_err(BackendError::Request)?;
        serde_json::from_slice(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

impl Backend for Client {
    fn targets(&self) -> Result<Vec<String>, BackendError> {
        self.get_json(self.endpoint("/targets.json")?)
    }

    fn report(&self) -> Result<Report, BackendError> {
        self.get_json(self.endpoint("/status.json")?)
    }

    fn log(&self, query: &LogQuery) -> Result<Vec<Record>, BackendError> {
        let mut url = self.endpoint("/log.json")?;
        url.query_pairs_mut()
            .clear()
            .append_pair("query", &query.query)
            .append_pair("since", &query.since)
            .append_pair("until", &query.until);

        let log: LogResponse = self.get_json(url)?;
        Ok(log.records)
    }
}
