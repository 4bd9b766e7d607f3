//! `sakura_secretmanager` against the mock server

use serde_json::json;

use super::common::{unique_name, Harness};

#[tokio::test]
async fn test_vault_bound_to_key_read_by_resource_id() {
    let harness = Harness::start().await;
    let key = harness
        .create("sakura_kms", json!({ "name": unique_name("key") }))
        .await;
    let name = unique_name("vault");

    let vault = harness
        .create(
            "sakura_secretmanager",
            json!({
                "name": name,
                "description": "description",
                "tags": ["tag1", "tag2"],
                "kms_key_id": key["id"]
            }),
        )
        .await;

    let response = harness
        .read_data_source("sakura_secretmanager", json!({ "resource_id": vault["id"] }))
        .await;
    assert!(!response.has_error(), "{:?}", response.diagnostics);
    let found = response.state.expect("state");
    assert_eq!(found["id"], vault["id"]);
    assert_eq!(found["name"], json!(name));
    assert_eq!(found["description"], "description");
    assert_eq!(found["tags"], json!(["tag1", "tag2"]));
    assert_eq!(found["kms_key_id"], key["id"]);

    let by_name = harness
        .read_data_source("sakura_secretmanager", json!({ "name": name }))
        .await;
    assert_eq!(by_name.state.expect("state")["id"], vault["id"]);
}

#[tokio::test]
async fn test_vault_update_and_delete() {
    let harness = Harness::start().await;
    let key = harness
        .create("sakura_kms", json!({ "name": unique_name("key") }))
        .await;
    let vault = harness
        .create(
            "sakura_secretmanager",
            json!({ "name": unique_name("vault"), "kms_key_id": key["id"] }),
        )
        .await;

    let mut planned = vault.clone();
    planned["name"] = json!("renamed");
    let updated = harness
        .state(json!({
            "operation": "update",
            "type_name": "sakura_secretmanager",
            "prior_state": vault,
            "planned_state": planned
        }))
        .await;
    assert_eq!(updated["name"], "renamed");
    assert_eq!(updated["kms_key_id"], key["id"]);

    harness
        .state(json!({
            "operation": "delete",
            "type_name": "sakura_secretmanager",
            "current_state": updated
        }))
        .await;
    assert_eq!(harness.read("sakura_secretmanager", &updated).await.state, None);
}

#[tokio::test]
async fn test_vault_with_unknown_key_is_rejected() {
    let harness = Harness::start().await;
    let response = harness
        .send(json!({
            "operation": "create",
            "type_name": "sakura_secretmanager",
            "planned_state": { "name": "orphan", "kms_key_id": "119999999999" }
        }))
        .await;
    assert!(response.has_error());
    let diagnostic = response.diagnostics.iter().next().expect("diagnostic");
    assert_eq!(diagnostic.summary, "Error creating sakura_secretmanager");
    assert!(diagnostic.detail.contains("does not exist"));
}
