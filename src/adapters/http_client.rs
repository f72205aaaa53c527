//! Native Remote Resource Client
//!
//! Talks to the class management API with `reqwest`. Every request, body
//! included, is bounded by the configured timeout; a timed out request is
//! reported as [`TransportError::Timeout`] and never yields partial bytes.

use crate::config::ApiSettings;
use async_trait::async_trait;
use awsm_dashboard_engine::{Endpoint, ResourceClient, TransportError};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub struct HttpResourceClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpResourceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, anyhow::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    pub fn from_settings(api: &ApiSettings) -> Result<Self, anyhow::Error> {
        Self::new(api.base_url.clone(), Duration::from_secs(api.timeout_secs))
    }

    fn transport_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(whole_secs(self.timeout))
        } else if err.is_connect() {
            TransportError::Network(format!("Connection error: {}", err))
        } else {
            TransportError::Network(err.to_string())
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, TransportError> {
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

/// Seconds reported for a timeout, rounded up so sub-second limits are not 0
fn whole_secs(timeout: Duration) -> u64 {
    timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0)
}

#[async_trait(?Send)]
impl ResourceClient for HttpResourceClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, endpoint: &Endpoint) -> Result<Vec<u8>, TransportError> {
        let url = self.url(endpoint);
        debug!(%url, "GET");
        let response = self.send(self.client.get(&url)).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(body.to_vec())
    }

    async fn put(&self, endpoint: &Endpoint, body: &Value) -> Result<(), TransportError> {
        let url = self.url(endpoint);
        debug!(%url, "PUT");
        self.send(self.client.put(&url).json(body)).await?;
        Ok(())
    }

    async fn delete(&self, endpoint: &Endpoint) -> Result<(), TransportError> {
        let url = self.url(endpoint);
        debug!(%url, "DELETE");
        self.send(self.client.delete(&url)).await?;
        Ok(())
    }
}
