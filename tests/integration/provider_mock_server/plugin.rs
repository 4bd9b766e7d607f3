//! Request envelope handling through `serve`

use std::collections::HashMap;

use serde_json::{json, Value};
use terraform_provider_sakura::plugin::serve;
use terraform_provider_sakura::SakuraProvider;

use super::common::{Harness, SECRET, TOKEN};

async fn serve_raw(provider: &SakuraProvider, input: &str) -> Value {
    let mut output = Vec::new();
    serve(provider, input.as_bytes(), &mut output)
        .await
        .expect("serve should not fail");
    assert_eq!(output.last(), Some(&b'\n'));
    serde_json::from_slice(&output).expect("response is JSON")
}

#[tokio::test]
async fn test_get_schema() {
    let provider = SakuraProvider::with_env("0.0.0-test", HashMap::new());
    let response = serve_raw(&provider, r#"{"operation":"get_schema"}"#).await;

    let schema = &response["schema"];
    assert!(schema["provider"]["attributes"]["token"]["sensitive"]
        .as_bool()
        .unwrap());
    assert!(schema["resource_schemas"]["sakura_kms"].is_object());
    assert!(schema["resource_schemas"]["sakura_secretmanager_secret"]["attributes"]["value"]
        ["sensitive"]
        .as_bool()
        .unwrap());
    assert!(schema["data_source_schemas"]["sakura_secretmanager"].is_object());
    assert_eq!(response["diagnostics"], json!([]));
}

#[tokio::test]
async fn test_invalid_request_is_answered() {
    let provider = SakuraProvider::with_env("0.0.0-test", HashMap::new());
    let response = serve_raw(&provider, "not json").await;
    assert_eq!(response["diagnostics"][0]["summary"], "Invalid request");
    assert_eq!(response["diagnostics"][0]["severity"], "error");
}

#[tokio::test]
async fn test_unknown_resource_type() {
    let harness = Harness::start().await;
    let response = harness
        .send(json!({
            "operation": "read",
            "type_name": "sakura_server",
            "current_state": { "id": "110000000001" }
        }))
        .await;
    assert!(response.has_error());
    assert_eq!(
        response.diagnostics.iter().next().expect("diagnostic").summary,
        "Unknown resource type"
    );
}

#[tokio::test]
async fn test_validate_resource_config() {
    let provider = SakuraProvider::with_env("0.0.0-test", HashMap::new());
    let response = serve_raw(
        &provider,
        &json!({
            "operation": "validate_resource_config",
            "type_name": "sakura_secretmanager",
            "config": { "name": "v", "kms_key_id": "abc", "colour": "blue" }
        })
        .to_string(),
    )
    .await;
    let attributes: Vec<&str> = response["diagnostics"]
        .as_array()
        .expect("diagnostics")
        .iter()
        .filter_map(|d| d["attribute"].as_str())
        .collect();
    assert!(attributes.contains(&"kms_key_id"));
    assert!(attributes.contains(&"colour"));
}

#[tokio::test]
async fn test_create_rejects_malformed_planned_state() {
    let harness = Harness::start().await;
    let response = harness
        .send(json!({
            "operation": "create",
            "type_name": "sakura_kms",
            "planned_state": { "name": "k", "tags": "tag1", "colour": "blue" }
        }))
        .await;

    assert!(response.has_error());
    assert_eq!(response.state, None::<Value>);
    let mut attributes: Vec<&str> = response
        .diagnostics
        .iter()
        .filter_map(|d| d.attribute.as_deref())
        .collect();
    attributes.sort_unstable();
    assert_eq!(attributes, vec!["colour", "tags"]);
    assert_eq!(harness.server.request_count(), 0);
}

#[tokio::test]
async fn test_explicit_config_overrides_environment() {
    let harness = Harness::start().await;
    let profile_dir = tempfile::tempdir().expect("temp dir");
    // The environment points at a port nothing listens on, with wrong credentials
    let env = HashMap::from([
        (
            "SAKURACLOUD_API_ROOT_URL".to_string(),
            "http://127.0.0.1:9".to_string(),
        ),
        ("SAKURACLOUD_ACCESS_TOKEN".to_string(), "wrong".to_string()),
        ("SAKURACLOUD_ACCESS_TOKEN_SECRET".to_string(), "wrong".to_string()),
        ("SAKURACLOUD_RETRY_MAX".to_string(), "0".to_string()),
        (
            "SAKURACLOUD_PROFILE_DIR".to_string(),
            profile_dir.path().display().to_string(),
        ),
    ]);
    let provider = SakuraProvider::with_env("0.0.0-test", env);

    let request = json!({
        "operation": "create",
        "type_name": "sakura_kms",
        "provider_config": {
            "token": TOKEN,
            "secret": SECRET,
            "api_root_url": harness.server.base_url()
        },
        "planned_state": { "name": "precedence" }
    });
    let response = serve_raw(&provider, &request.to_string()).await;
    assert_eq!(response["diagnostics"], json!([]));
    assert_eq!(response["state"]["name"], "precedence");
}

#[tokio::test]
async fn test_bad_environment_value_is_reported() {
    let env = HashMap::from([("SAKURACLOUD_API_REQUEST_TIMEOUT".to_string(), "soon".to_string())]);
    let provider = SakuraProvider::with_env("0.0.0-test", env);
    let request = json!({
        "operation": "read_data_source",
        "type_name": "sakura_kms",
        "provider_config": { "token": TOKEN, "secret": SECRET },
        "config": { "name": "k" }
    });
    let response = serve_raw(&provider, &request.to_string()).await;
    assert_eq!(
        response["diagnostics"][0]["summary"],
        "Error parsing environment variable \"SAKURACLOUD_API_REQUEST_TIMEOUT\""
    );
    assert_eq!(response["state"], Value::Null);
}
