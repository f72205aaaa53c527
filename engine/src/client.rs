//! Ports to the outside world: the class management API and the modal host

use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;

/// Class management API endpoints, relative to the client's base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET /classes/{apiType}`
    ClassList { api_type: String },
    /// `GET /classes/{apiType}/options`
    ClassOptions { api_type: String },
    /// `GET /assets/instances-running`
    RunningInstances,
    /// `PUT`/`DELETE /classes/{apiType}/name/{className}`
    Class { api_type: String, class_name: String },
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::ClassList { api_type } => format!("/classes/{}", api_type),
            Endpoint::ClassOptions { api_type } => format!("/classes/{}/options", api_type),
            Endpoint::RunningInstances => "/assets/instances-running".to_string(),
            Endpoint::Class {
                api_type,
                class_name,
            } => format!(
                "/classes/{}/name/{}",
                api_type,
                urlencoding::encode(class_name)
            ),
        }
    }
}

/// HTTP access to the class management API.
///
/// Implementations own the base URL and enforce the request timeout; a timed
/// out request fails like any other network error and never yields partial
/// bytes.
#[async_trait(?Send)]
pub trait ResourceClient {
    fn base_url(&self) -> &str;

    /// Absolute URL of an endpoint, also used in error alerts
    fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url().trim_end_matches('/'), endpoint.path())
    }

    async fn get(&self, endpoint: &Endpoint) -> Result<Vec<u8>, TransportError>;

    /// Response body is ignored
    async fn put(&self, endpoint: &Endpoint, body: &Value) -> Result<(), TransportError>;

    async fn delete(&self, endpoint: &Endpoint) -> Result<(), TransportError>;
}

/// Navigation signals an editor sends to whatever mounted it
pub trait ModalHost {
    /// Return to the view the editor was opened from
    fn back_button(&self);

    /// Close every open modal, including the editor
    fn hide_all_modals(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    #[async_trait(?Send)]
    impl ResourceClient for Fixed {
        fn base_url(&self) -> &str {
            self.0
        }

        async fn get(&self, _endpoint: &Endpoint) -> Result<Vec<u8>, TransportError> {
            Ok(Vec::new())
        }

        async fn put(&self, _endpoint: &Endpoint, _body: &Value) -> Result<(), TransportError> {
            Ok(())
        }

        async fn delete(&self, _endpoint: &Endpoint) -> Result<(), TransportError> {
            Ok(())
        }
    }

    #[test]
    fn test_urls() {
        let client = Fixed("http://localhost:8081/api/");
        assert_eq!(
            client.url(&Endpoint::ClassOptions {
                api_type: "images".to_string()
            }),
            "http://localhost:8081/api/classes/images/options"
        );
        assert_eq!(
            client.url(&Endpoint::RunningInstances),
            "http://localhost:8081/api/assets/instances-running"
        );
        assert_eq!(
            client.url(&Endpoint::Class {
                api_type: "snapshots".to_string(),
                class_name: "nightly backup".to_string(),
            }),
            "http://localhost:8081/api/classes/snapshots/name/nightly%20backup"
        );
    }
}
