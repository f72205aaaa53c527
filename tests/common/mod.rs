use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type ClassStore = Arc<Mutex<BTreeMap<String, BTreeMap<String, Value>>>>;

/// In-memory stand-in for the class management API
#[derive(Clone, Default)]
pub struct MockApi {
    pub classes: ClassStore,
    pub options_delay: Option<Duration>,
    pub fail_instances: bool,
}

#[allow(dead_code)]
impl MockApi {
    pub fn with_class(self, api_type: &str, name: &str, class: Value) -> Self {
        self.classes
            .lock()
            .unwrap()
            .entry(api_type.to_string())
            .or_default()
            .insert(name.to_string(), class);
        self
    }

    pub fn class(&self, api_type: &str, name: &str) -> Option<Value> {
        self.classes
            .lock()
            .unwrap()
            .get(api_type)
            .and_then(|classes| classes.get(name))
            .cloned()
    }
}

async fn list_classes(State(api): State<MockApi>, Path(api_type): Path<String>) -> Json<Value> {
    let classes = api
        .classes
        .lock()
        .unwrap()
        .get(&api_type)
        .cloned()
        .unwrap_or_default();
    Json(json!({ "classes": classes }))
}

async fn class_options(State(api): State<MockApi>, Path(_api_type): Path<String>) -> Json<Value> {
    if let Some(delay) = api.options_delay {
        tokio::time::sleep(delay).await;
    }
    Json(json!({
        "classOptions": {
            "regions": ["us-east-1", "us-west-2"],
            "metricName": ["t3.micro", "m5.large"]
        }
    }))
}

async fn running_instances(State(api): State<MockApi>) -> Result<Json<Value>, StatusCode> {
    if api.fail_instances {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(json!({
        "assets": [
            {"instanceID": "i-0abc", "name": "web", "availabilityZone": "us-east-1a"},
            {"instanceID": "i-0def", "name": "", "availabilityZone": "us-east-1b"}
        ]
    })))
}

async fn put_class(
    State(api): State<MockApi>,
    Path((api_type, name)): Path<(String, String)>,
    Json(class): Json<Value>,
) -> StatusCode {
    api.classes
        .lock()
        .unwrap()
        .entry(api_type)
        .or_default()
        .insert(name, class);
    StatusCode::OK
}

async fn delete_class(
    State(api): State<MockApi>,
    Path((api_type, name)): Path<(String, String)>,
) -> StatusCode {
    let removed = api
        .classes
        .lock()
        .unwrap()
        .get_mut(&api_type)
        .and_then(|classes| classes.remove(&name));
    match removed {
        Some(_) => StatusCode::OK,
        None => StatusCode::NOT_FOUND,
    }
}

#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: String,
    pub api: MockApi,
}

impl TestServer {
    pub async fn start(api: MockApi) -> Self {
        let app = Router::new()
            .route("/api/classes/:api_type", get(list_classes))
            .route("/api/classes/:api_type/options", get(class_options))
            .route(
                "/api/classes/:api_type/name/:name",
                put(put_class).delete(delete_class),
            )
            .route("/api/assets/instances-running", get(running_instances))
            .with_state(api.clone());

        // Start server on random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}/api", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer {
            addr,
            base_url,
            api,
        }
    }

    #[allow(dead_code)]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
