//! Delivery of payloads to the speakable endpoint.
//!
//! One POST per dispatch. Failures and successes are only reported on the
//! diagnostic channel; callers never see an error.

use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::debug_log::DebugLog;

/// Request body for the speakable endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
}

impl Payload {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            session_id: None,
            cwd: None,
        }
    }

    pub fn with_session(mut self, session_id: Option<String>, cwd: Option<String>) -> Self {
        self.session_id = session_id.filter(|s| !s.is_empty());
        self.cwd = cwd.filter(|c| !c.is_empty());
        self
    }
}

pub struct Dispatcher {
    client: Client,
    endpoint: String,
    log: Arc<dyn DebugLog>,
}

impl Dispatcher {
    pub fn new(endpoint: impl Into<String>, log: Arc<dyn DebugLog>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            log,
        }
    }

    /// POST the payload and wait for the response. Never fails.
    pub async fn dispatch(&self, payload: &Payload) {
        let preview: String = payload.text.chars().take(80).collect();
        debug!(
            "POST {} ({} chars): \"{}\"",
            self.endpoint,
            payload.text.chars().count(),
            preview.replace('\n', " "),
        );
        self.log.record(
            "dispatch_request",
            json!({
                "endpoint": self.endpoint,
                "payload": payload,
            }),
        );

        let resp = match self.client.post(&self.endpoint).json(payload).send().await {
            Ok(resp) => resp,
            Err(e) => {
                let reason = if e.is_connect() {
                    "connect"
                } else if e.is_timeout() {
                    "timeout"
                } else {
                    "request"
                };
                warn!("Speakable request to {} failed: {e}", self.endpoint);
                self.log.record(
                    "dispatch_error",
                    json!({ "kind": reason, "error": e.to_string() }),
                );
                return;
            }
        };

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("Speakable endpoint returned status {status}");
            self.log.record(
                "dispatch_error",
                json!({ "kind": "status", "status": status.as_u16(), "body": body }),
            );
            return;
        }

        let body = match resp.json::<Value>().await {
            Ok(data) => data,
            Err(e) => {
                debug!("Speakable response is not JSON: {e}");
                Value::Null
            }
        };
        info!("Speakable accepted payload ({status})");
        self.log.record(
            "dispatch_response",
            json!({ "status": status.as_u16(), "body": body }),
        );
    }
}
