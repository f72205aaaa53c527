//! Browser client for the class management API

use async_trait::async_trait;
use awsm_dashboard_engine::{ClassCatalog, Endpoint, ResourceClient, TransportError};
use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_timers::callback::Timeout;
use serde_json::Value;
use std::cell::Cell;
use std::rc::Rc;
use web_sys::{AbortController, AbortSignal};

pub const API_BASE: &str = "/api";
pub const TIMEOUT_SECS: u64 = 3;

/// `gloo-net` client. Each request is aborted once the timeout elapses.
///
/// Provided as context by `App`; components take their copy from there.
#[derive(Clone)]
pub struct GlooResourceClient {
    base_url: String,
    timeout_secs: u64,
}

impl Default for GlooResourceClient {
    fn default() -> Self {
        Self::new(API_BASE, TIMEOUT_SECS)
    }
}

/// Abort timer of one request; dropping it cancels the timer
struct Deadline {
    signal: AbortSignal,
    fired: Rc<Cell<bool>>,
    _timer: Timeout,
}

impl GlooResourceClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs,
        }
    }

    fn deadline(&self) -> Result<Deadline, TransportError> {
        let controller = AbortController::new()
            .map_err(|_| TransportError::Network("AbortController unavailable".to_string()))?;
        let signal = controller.signal();
        let fired = Rc::new(Cell::new(false));

        let flag = fired.clone();
        let millis = u32::try_from(self.timeout_secs.saturating_mul(1000)).unwrap_or(u32::MAX);
        let timer = Timeout::new(millis, move || {
            flag.set(true);
            controller.abort();
        });

        Ok(Deadline {
            signal,
            fired,
            _timer: timer,
        })
    }

    fn transport_error(&self, deadline: &Deadline, err: gloo_net::Error) -> TransportError {
        if deadline.fired.get() {
            TransportError::Timeout(self.timeout_secs)
        } else {
            TransportError::Network(err.to_string())
        }
    }

    async fn send(&self, deadline: &Deadline, request: Request) -> Result<Response, TransportError> {
        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(deadline, e))?;

        if !response.ok() {
            return Err(TransportError::Status {
                status: response.status(),
            });
        }
        Ok(response)
    }

    fn build(&self, deadline: &Deadline, builder: RequestBuilder) -> Result<Request, TransportError> {
        builder
            .abort_signal(Some(&deadline.signal))
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to build request: {}", e)))
    }
}

#[async_trait(?Send)]
impl ResourceClient for GlooResourceClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, endpoint: &Endpoint) -> Result<Vec<u8>, TransportError> {
        let deadline = self.deadline()?;
        let request = self.build(&deadline, Request::get(&self.url(endpoint)))?;
        let response = self.send(&deadline, request).await?;
        response
            .binary()
            .await
            .map_err(|e| self.transport_error(&deadline, e))
    }

    async fn put(&self, endpoint: &Endpoint, body: &Value) -> Result<(), TransportError> {
        let deadline = self.deadline()?;
        let request = Request::put(&self.url(endpoint))
            .abort_signal(Some(&deadline.signal))
            .json(body)
            .map_err(|e| TransportError::Network(format!("Failed to serialize body: {}", e)))?;
        self.send(&deadline, request).await?;
        Ok(())
    }

    async fn delete(&self, endpoint: &Endpoint) -> Result<(), TransportError> {
        let deadline = self.deadline()?;
        let request = self.build(&deadline, Request::delete(&self.url(endpoint)))?;
        self.send(&deadline, request).await?;
        Ok(())
    }
}

/// Existing classes of one type
pub async fn list_classes(
    client: &GlooResourceClient,
    api_type: &'static str,
) -> Result<ClassCatalog, String> {
    let endpoint = Endpoint::ClassList {
        api_type: api_type.to_string(),
    };
    let bytes = client
        .get(&endpoint)
        .await
        .map_err(|e| format!("Error while querying endpoint: {} ({})", client.url(&endpoint), e))?;
    ClassCatalog::decode(&bytes).map_err(|e| format!("Failed to parse response: {}", e))
}
