//! API client behaviour against the mock server: auth, retries, errors

use std::time::Duration;

use terraform_provider_sakura::client::types::{CreateKeyRequest, KeyOrigin};
use terraform_provider_sakura::client::{ApiClient, ApiError, ClientOptions, RetryPolicy, TraceMode};
use zeroize::Zeroizing;

use super::common::{Harness, SECRET, TOKEN};

fn options(base_url: String, secret: &str, max_retries: u32) -> ClientOptions {
    ClientOptions {
        api_root_url: base_url,
        access_token: TOKEN.to_string(),
        access_token_secret: Zeroizing::new(secret.to_string()),
        timeout: Duration::from_secs(5),
        retry: RetryPolicy {
            max_retries,
            wait_min: Duration::from_millis(5),
            wait_max: Duration::from_millis(20),
        },
        rate_limit: 0,
        trace: TraceMode::All,
        user_agent: "integration-test".to_string(),
    }
}

fn key_request(name: &str) -> CreateKeyRequest {
    CreateKeyRequest {
        name: name.to_string(),
        description: String::new(),
        tags: Vec::new(),
        key_origin: KeyOrigin::Generated,
        plain_key: None,
    }
}

#[tokio::test]
async fn test_retries_unavailable_responses() {
    let harness = Harness::start().await;
    let client = ApiClient::from_options(options(harness.server.base_url(), SECRET, 3))
        .expect("client builds");

    harness.server.fail_next_requests(2);
    let key = client
        .kms
        .create_key(&key_request("retried"))
        .await
        .expect("succeeds after retries");
    assert_eq!(key.name, "retried");
    assert_eq!(harness.server.request_count(), 3);
}

#[tokio::test]
async fn test_gives_up_after_retry_max() {
    let harness = Harness::start().await;
    let client = ApiClient::from_options(options(harness.server.base_url(), SECRET, 1))
        .expect("client builds");

    harness.server.fail_next_requests(5);
    let err = client.kms.list_keys().await.unwrap_err();
    assert!(
        matches!(err, ApiError::Status { status, .. } if status.as_u16() == 503),
        "unexpected error {err:?}"
    );
    assert_eq!(harness.server.request_count(), 2);
}

#[tokio::test]
async fn test_wrong_credentials() {
    let harness = Harness::start().await;
    let client = ApiClient::from_options(options(harness.server.base_url(), "wrong", 0))
        .expect("client builds");

    let err = client.kms.list_keys().await.unwrap_err();
    assert!(
        matches!(err, ApiError::Status { status, ref message, .. }
            if status.as_u16() == 401 && message == "invalid access token"),
        "unexpected error {err:?}"
    );
}

#[tokio::test]
async fn test_not_found_is_typed() {
    let harness = Harness::start().await;
    let client = ApiClient::from_options(options(harness.server.base_url(), SECRET, 0))
        .expect("client builds");

    let err = client.secret_manager.read_vault("119999999999").await.unwrap_err();
    assert!(err.is_not_found());
}
