//! `sakura_secretmanager_secret` against the mock server

use serde_json::{json, Value};

use super::common::{unique_name, Harness};

async fn vault(harness: &Harness) -> Value {
    let key = harness
        .create("sakura_kms", json!({ "name": unique_name("key") }))
        .await;
    harness
        .create(
            "sakura_secretmanager",
            json!({ "name": unique_name("vault"), "kms_key_id": key["id"] }),
        )
        .await
}

#[tokio::test]
async fn test_secret_versions_and_unveil() {
    let harness = Harness::start().await;
    let vault = vault(&harness).await;
    let vault_id = vault["id"].as_str().expect("vault id").to_string();

    let secret = harness
        .create(
            "sakura_secretmanager_secret",
            json!({ "vault_id": vault_id, "name": "db-password", "value": "first" }),
        )
        .await;
    assert_eq!(secret["id"], json!(format!("{vault_id}/db-password")));
    assert_eq!(secret["version"], 1);

    let mut planned = secret.clone();
    planned["value"] = json!("second");
    let updated = harness
        .state(json!({
            "operation": "update",
            "type_name": "sakura_secretmanager_secret",
            "prior_state": secret,
            "planned_state": planned
        }))
        .await;
    assert_eq!(updated["version"], 2);

    let latest = harness
        .read_data_source(
            "sakura_secretmanager_secret",
            json!({ "vault_id": vault_id, "name": "db-password" }),
        )
        .await
        .state
        .expect("state");
    assert_eq!(latest["value"], "second");
    assert_eq!(latest["version"], 2);

    let first = harness
        .read_data_source(
            "sakura_secretmanager_secret",
            json!({ "vault_id": vault_id, "name": "db-password", "version": 1 }),
        )
        .await
        .state
        .expect("state");
    assert_eq!(first["value"], "first");
}

#[tokio::test]
async fn test_secret_import_and_delete() {
    let harness = Harness::start().await;
    let vault = vault(&harness).await;
    let vault_id = vault["id"].as_str().expect("vault id").to_string();
    harness
        .create(
            "sakura_secretmanager_secret",
            json!({ "vault_id": vault_id, "name": "api-key", "value": "s3cr3t" }),
        )
        .await;

    let imported = harness
        .state(json!({
            "operation": "import",
            "type_name": "sakura_secretmanager_secret",
            "id": format!("{vault_id}/api-key")
        }))
        .await;
    assert_eq!(imported["value"], "s3cr3t");
    assert_eq!(imported["version"], 1);

    harness
        .state(json!({
            "operation": "delete",
            "type_name": "sakura_secretmanager_secret",
            "current_state": imported
        }))
        .await;
    let read = harness
        .read("sakura_secretmanager_secret", &imported)
        .await;
    assert!(!read.has_error());
    assert_eq!(read.state, None);
}
