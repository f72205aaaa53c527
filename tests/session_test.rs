mod common;

use awsm_dashboard::adapters::http_client::HttpResourceClient;
use awsm_dashboard::cli::{Command, EditArgs};
use awsm_dashboard_engine::ResourceClient;
use common::{MockApi, TestServer};
use serde_json::json;
use std::rc::Rc;
use std::time::Duration;

fn client(server: &TestServer) -> Rc<dyn ResourceClient> {
    Rc::new(HttpResourceClient::new(server.base_url.clone(), Duration::from_secs(3)).unwrap())
}

fn edit(api_type: &str, class_name: &str) -> EditArgs {
    EditArgs {
        api_type: api_type.to_string(),
        class_name: class_name.to_string(),
        file: None,
        set: Vec::new(),
        save: false,
        delete: false,
    }
}

fn set(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

async fn run(server: &TestServer, command: Command) -> (anyhow::Result<bool>, String) {
    let mut out = Vec::new();
    let result = awsm_dashboard::run(&command, client(server), &mut out).await;
    (result, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_classes_command() {
    let api = MockApi::default()
        .with_class("images", "golden", json!({"rotate": true}))
        .with_class("images", "base", json!({}));
    let server = TestServer::start(api).await;

    let (result, out) = run(
        &server,
        Command::Classes {
            api_type: "images".to_string(),
        },
    )
    .await;
    assert!(result.unwrap());
    assert_eq!(out, "base\ngolden\n");
}

#[tokio::test]
async fn test_options_command() {
    let server = TestServer::start(MockApi::default()).await;

    let (result, out) = run(
        &server,
        Command::Options {
            api_type: "launchconfigurations".to_string(),
        },
    )
    .await;
    assert!(result.unwrap());
    assert!(out.contains("regions: us-east-1, us-west-2\n"));
    assert!(out.contains("metricName: t3.micro, m5.large\n"));
}

#[tokio::test]
async fn test_unknown_class_type() {
    let server = TestServer::start(MockApi::default()).await;

    let (result, _) = run(
        &server,
        Command::Classes {
            api_type: "volumes".to_string(),
        },
    )
    .await;
    assert!(result.unwrap_err().to_string().contains("Unknown class type"));
}

#[tokio::test]
async fn test_edit_saves_class() {
    let api = MockApi::default().with_class(
        "snapshots",
        "nightly",
        json!({"rotate": false, "volumeID": "vol-1", "owner": "ops"}),
    );
    let server = TestServer::start(api).await;

    let mut args = edit("snapshots", "nightly");
    args.set = set(&[("rotate", "true"), ("retain", "5")]);
    args.save = true;

    let (result, out) = run(&server, Command::Edit(args)).await;
    assert!(result.unwrap());
    assert!(out.contains("Retain (retain, number): 5\n"));
    assert!(out.contains("[Success] step 2: Class was saved"));

    let saved = server.api.class("snapshots", "nightly").unwrap();
    assert_eq!(saved["rotate"], json!(true));
    assert_eq!(saved["retain"], json!(5));
    assert_eq!(saved["owner"], json!("ops"));
}

#[tokio::test]
async fn test_edit_deletes_class() {
    let api = MockApi::default().with_class("images", "golden", json!({"instanceID": "i-0abc"}));
    let server = TestServer::start(api).await;

    let mut args = edit("images", "golden");
    args.delete = true;

    let (result, out) = run(&server, Command::Edit(args)).await;
    assert!(result.unwrap());
    assert!(out.contains("choices: web (i-0abc) - us-east-1a, i-0def - us-east-1b"));
    assert!(out.contains("[Success] step 2: Class was deleted"));
    assert!(server.api.class("images", "golden").is_none());
}

#[tokio::test]
async fn test_new_class_cannot_be_deleted() {
    let server = TestServer::start(MockApi::default()).await;

    let mut args = edit("snapshots", "fresh");
    args.delete = true;

    let (result, _) = run(&server, Command::Edit(args)).await;
    assert!(result.unwrap_err().to_string().contains("cannot be deleted"));
}

#[tokio::test]
async fn test_edit_reports_fetch_failure() {
    let api = MockApi {
        fail_instances: true,
        ..MockApi::default()
    };
    let server = TestServer::start(api).await;

    let mut args = edit("images", "golden");
    args.save = true;

    let (result, out) = run(&server, Command::Edit(args)).await;
    assert!(!result.unwrap());
    assert!(out.contains(&format!(
        "[Error] step 1: Error while querying endpoint: {}",
        server.url("/assets/instances-running")
    )));
    assert!(server.api.class("images", "golden").is_none());
}

#[tokio::test]
async fn test_edit_rejects_bad_input() {
    let server = TestServer::start(MockApi::default()).await;

    let mut args = edit("snapshots", "nightly");
    args.set = set(&[("owner", "ops")]);
    let (result, _) = run(&server, Command::Edit(args)).await;
    assert!(result.unwrap_err().to_string().contains("owner"));

    let mut args = edit("snapshots", "nightly");
    args.set = set(&[("retain", "many")]);
    let (result, _) = run(&server, Command::Edit(args)).await;
    assert!(result.unwrap_err().to_string().contains("expects a number value"));
}

#[tokio::test]
async fn test_edit_from_file() {
    let server = TestServer::start(MockApi::default()).await;
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("class.json");
    std::fs::write(&path, r#"{"rotate": true, "retain": 9, "step": 2}"#).unwrap();

    let mut args = edit("snapshots", "imported");
    args.file = Some(path);

    let (result, out) = run(&server, Command::Edit(args)).await;
    assert!(result.unwrap());
    assert!(out.contains("Retain (retain, number): 9\n"));
    assert!(out.contains("actions: Save, Delete\n"));
    assert!(out.contains("[Ready] step 1"));
}
