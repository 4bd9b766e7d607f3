//! Shared fixtures: mock server, provider and request helpers.

use std::collections::HashMap;

use mock_server::MockServer;
use serde_json::{json, Value};
use terraform_provider_sakura::plugin::{handle, Request, Response};
use terraform_provider_sakura::SakuraProvider;

pub const TOKEN: &str = "test-token";
pub const SECRET: &str = "test-secret";

/// A mock server plus a provider configured to talk to it
pub struct Harness {
    pub server: MockServer,
    pub provider: SakuraProvider,
    // Keeps the empty profile directory alive for the provider's lifetime
    _profile_dir: tempfile::TempDir,
}

impl Harness {
    pub async fn start() -> Self {
        let server = mock_server::spawn(Some((TOKEN.to_string(), SECRET.to_string())))
            .await
            .expect("mock server should start");
        let profile_dir = tempfile::tempdir().expect("temp dir");
        let env = HashMap::from([(
            "SAKURACLOUD_PROFILE_DIR".to_string(),
            profile_dir.path().display().to_string(),
        )]);
        Self {
            server,
            provider: SakuraProvider::with_env("0.0.0-test", env),
            _profile_dir: profile_dir,
        }
    }

    pub fn provider_config(&self) -> Value {
        json!({
            "token": TOKEN,
            "secret": SECRET,
            "api_root_url": self.server.base_url(),
            "retry_max": 0,
            "api_request_rate_limit": 100
        })
    }

    /// Send one request, filling in `provider_config`
    pub async fn send(&self, mut request: Value) -> Response {
        request["provider_config"] = self.provider_config();
        let request: Request = serde_json::from_value(request).expect("valid request");
        handle(&self.provider, request).await
    }

    /// Send a request that must succeed and return its state
    pub async fn state(&self, request: Value) -> Value {
        let response = self.send(request).await;
        assert!(
            !response.has_error(),
            "unexpected diagnostics: {:?}",
            response.diagnostics
        );
        response.state.unwrap_or(Value::Null)
    }

    pub async fn create(&self, type_name: &str, planned_state: Value) -> Value {
        self.state(json!({
            "operation": "create",
            "type_name": type_name,
            "planned_state": planned_state
        }))
        .await
    }

    pub async fn read(&self, type_name: &str, current_state: &Value) -> Response {
        self.send(json!({
            "operation": "read",
            "type_name": type_name,
            "current_state": current_state
        }))
        .await
    }

    pub async fn read_data_source(&self, type_name: &str, config: Value) -> Response {
        self.send(json!({
            "operation": "read_data_source",
            "type_name": type_name,
            "config": config
        }))
        .await
    }
}

/// Random, readable resource name
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", &uuid::Uuid::new_v4().simple().to_string()[..8])
}
