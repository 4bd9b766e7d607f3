//! `sakura_kms` against the mock server

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};

use super::common::{unique_name, Harness};

#[tokio::test]
async fn test_kms_key_read_back_by_name_and_id() {
    let harness = Harness::start().await;
    let name = unique_name("key");

    let state = harness
        .create(
            "sakura_kms",
            json!({
                "name": name,
                "description": "description",
                "tags": ["tag1", "tag2"]
            }),
        )
        .await;
    let id = state["id"].as_str().expect("id is set").to_string();
    assert_eq!(id.len(), 12);
    assert_eq!(state["key_origin"], "generated");

    let by_name = harness
        .read_data_source("sakura_kms", json!({ "name": name }))
        .await;
    let by_id = harness
        .read_data_source("sakura_kms", json!({ "resource_id": id }))
        .await;

    for response in [by_name, by_id] {
        assert!(!response.has_error(), "{:?}", response.diagnostics);
        let found = response.state.expect("state");
        assert_eq!(found["id"], json!(id));
        assert_eq!(found["name"], json!(name));
        assert_eq!(found["description"], "description");
        assert_eq!(found["tags"], json!(["tag1", "tag2"]));
        assert_eq!(found["key_origin"], "generated");
    }
}

#[tokio::test]
async fn test_kms_key_update_then_delete() {
    let harness = Harness::start().await;
    let state = harness
        .create("sakura_kms", json!({ "name": unique_name("key") }))
        .await;

    let mut planned = state.clone();
    planned["description"] = json!("rotated");
    planned["tags"] = json!(["env:test"]);
    let updated = harness
        .state(json!({
            "operation": "update",
            "type_name": "sakura_kms",
            "prior_state": state,
            "planned_state": planned
        }))
        .await;
    assert_eq!(updated["description"], "rotated");
    assert_eq!(updated["tags"], json!(["env:test"]));

    let deleted = harness
        .send(json!({
            "operation": "delete",
            "type_name": "sakura_kms",
            "current_state": updated
        }))
        .await;
    assert!(!deleted.has_error());
    assert_eq!(deleted.state, None);

    let read = harness.read("sakura_kms", &updated).await;
    assert!(!read.has_error());
    assert_eq!(read.state, None, "a deleted key is removed from state");
}

#[tokio::test]
async fn test_imported_key_material() {
    let harness = Harness::start().await;
    let plain_key = STANDARD.encode([42u8; 32]);

    let state = harness
        .create(
            "sakura_kms",
            json!({
                "name": unique_name("imported"),
                "key_origin": "imported",
                "plain_key": plain_key
            }),
        )
        .await;
    assert_eq!(state["key_origin"], "imported");
    assert_eq!(state["plain_key"], json!(plain_key));

    let read = harness.read("sakura_kms", &state).await;
    assert_eq!(read.state.expect("state")["plain_key"], json!(plain_key));
}

#[tokio::test]
async fn test_import_by_id() {
    let harness = Harness::start().await;
    let state = harness
        .create("sakura_kms", json!({ "name": unique_name("key") }))
        .await;

    let imported = harness
        .state(json!({
            "operation": "import",
            "type_name": "sakura_kms",
            "id": state["id"]
        }))
        .await;
    assert_eq!(imported["name"], state["name"]);

    let missing = harness
        .send(json!({
            "operation": "import",
            "type_name": "sakura_kms",
            "id": "119999999999"
        }))
        .await;
    assert!(missing.has_error());
}

#[tokio::test]
async fn test_duplicate_names_fail_lookup() {
    let harness = Harness::start().await;
    let name = unique_name("dup");
    for _ in 0..2 {
        harness.create("sakura_kms", json!({ "name": name })).await;
    }

    let response = harness
        .read_data_source("sakura_kms", json!({ "name": name }))
        .await;
    assert!(response.has_error());
    let diagnostic = response.diagnostics.iter().next().expect("diagnostic");
    assert_eq!(diagnostic.summary, "Error reading sakura_kms");
    assert!(diagnostic.detail.contains("2 KMS keys named"));

    let response = harness
        .read_data_source("sakura_kms", json!({ "name": "does-not-exist" }))
        .await;
    assert!(response.has_error());
    assert_eq!(response.state, None::<Value>);
}
