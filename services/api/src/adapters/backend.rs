//! services/api/src/adapters/backend.rs
//!
//! This module contains the adapter for the remote MindiNote backend.
//! It implements the `SummarizationService` and `AccountService` ports from the
//! `core` crate, and exposes the raw relay used by the forwarding proxy.

use async_trait::async_trait;
use mindinote_core::ports::{
    AccountService, PortError, PortResult, SignupOutcome, SummarizationService,
};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error};

/// Path of the backend's analysis endpoint.
pub const ANALYZE_PATH: &str = "/api/ai/analyze";
/// Path of the backend's signup endpoint. A GET on it returns the demo user.
pub const SIGNUP_PATH: &str = "/api/auth/signup";

/// Response fields that may carry a summary, in the order they are tried.
const SUMMARY_FIELDS: [&str; 4] = ["/result", "/summary", "/data/result", "/data/summary"];

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that talks to the backend over HTTP.
#[derive(Clone, Debug)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    /// Creates a new `BackendClient` whose requests give up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Posts `body` unchanged to the analysis endpoint and returns the backend's
    /// status with its JSON body. A missing or non-JSON body reads as `{}`.
    pub async fn relay_analyze(&self, body: &Value) -> Result<(StatusCode, Value), reqwest::Error> {
        let response = self
            .client
            .post(self.url(ANALYZE_PATH))
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let data = read_json(response).await;
        debug!(status = status.as_u16(), "Backend answered relayed analyze request");
        Ok((status, data))
    }

    async fn call(&self, request: reqwest::RequestBuilder) -> PortResult<Value> {
        let response = request.send().await.map_err(|e| {
            error!("Backend request failed: {:?}", e);
            PortError::Remote(e.without_url().to_string())
        })?;

        let status = response.status();
        let data = read_json(response).await;
        if !status.is_success() {
            return Err(PortError::Remote(error_message(status, &data)));
        }
        Ok(data)
    }
}

//=========================================================================================
// Port Trait Implementations
//=========================================================================================

#[async_trait]
impl SummarizationService for BackendClient {
    /// Asks the backend for a summary and picks it out of whichever known response
    /// shape came back. An answer without any summary field yields an empty string.
    async fn summarize(&self, text: &str) -> PortResult<String> {
        let body = json!({ "text": text, "content": text, "type": "summary" });
        let data = self
            .call(self.client.post(self.url(ANALYZE_PATH)).json(&body))
            .await?;
        Ok(extract_summary(&data))
    }
}

#[async_trait]
impl AccountService for BackendClient {
    async fn signup(&self, email: &str, name: &str, password: &str) -> PortResult<SignupOutcome> {
        let body = json!({ "email": email, "name": name, "password": password });
        let data = self
            .call(self.client.post(self.url(SIGNUP_PATH)).json(&body))
            .await?;
        ensure_ok(&data)?;

        let user_id = opaque_id(&data["data"]["id"]).ok_or_else(|| {
            PortError::Unexpected("Signup response did not include a user id".to_string())
        })?;
        let email = data["data"]["email"]
            .as_str()
            .unwrap_or(email)
            .to_string();
        let is_new = data["isNew"].as_bool().unwrap_or(false);

        Ok(SignupOutcome {
            user_id,
            email,
            is_new,
        })
    }

    async fn demo_user(&self) -> PortResult<String> {
        let data = self.call(self.client.get(self.url(SIGNUP_PATH))).await?;
        ensure_ok(&data)?;
        opaque_id(&data["data"]["id"]).ok_or_else(|| {
            PortError::Unexpected("Demo user response did not include a user id".to_string())
        })
    }
}

//=========================================================================================
// Response Helpers
//=========================================================================================

async fn read_json(response: Response) -> Value {
    match response.bytes().await {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|_| json!({})),
        Err(_) => json!({}),
    }
}

/// The first non-empty summary found in `data`, trying each known field in order.
pub fn extract_summary(data: &Value) -> String {
    SUMMARY_FIELDS
        .iter()
        .filter_map(|pointer| data.pointer(pointer).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// A human readable message for a failed response.
pub fn error_message(status: StatusCode, data: &Value) -> String {
    body_message(data).unwrap_or_else(|| format!("Error {}", status.as_u16()))
}

fn body_message(data: &Value) -> Option<String> {
    ["error", "message"]
        .iter()
        .filter_map(|field| data[*field].as_str())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Rejects a success response whose body still says `"ok": false`.
fn ensure_ok(data: &Value) -> PortResult<()> {
    if data["ok"].as_bool() == Some(false) {
        let message = body_message(data).unwrap_or_else(|| "Request was not accepted".to_string());
        return Err(PortError::Remote(message));
    }
    Ok(())
}

fn opaque_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
