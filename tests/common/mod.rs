#![allow(dead_code)]

use async_trait::async_trait;
use baklib_mcp::errors::ToolError;
use baklib_mcp::services::gateway::{ApiTransport, RequestOptions};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::Mutex;

pub static ENV_LOCK: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub type_name: String,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub method: String,
    pub query: Vec<(String, String)>,
    pub json_body: Option<Value>,
    pub multipart: Option<RecordedUpload>,
}

/// Stands in for the HTTP gateway behind the `ApiTransport` seam: records
/// every call and answers with a canned envelope or failure.
pub struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
    outcome: Result<Value, ToolError>,
}

impl RecordingTransport {
    pub fn returning(envelope: Value) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            outcome: Ok(envelope),
        }
    }

    pub fn failing(error: ToolError) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            outcome: Err(error),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }
}

#[async_trait]
impl ApiTransport for RecordingTransport {
    async fn issue(
        &self,
        path: &str,
        method: reqwest::Method,
        options: RequestOptions,
    ) -> Result<Value, ToolError> {
        let multipart = options.multipart.as_ref().map(|file| RecordedUpload {
            type_name: file.type_name.clone(),
            file_name: file.file_name.clone(),
            content_type: file.content_type.clone(),
            size: file.bytes.len(),
        });
        self.calls.lock().expect("calls lock").push(RecordedCall {
            path: path.to_string(),
            method: method.to_string(),
            query: options.query.clone(),
            json_body: options.json_body.clone(),
            multipart,
        });
        self.outcome.clone()
    }
}
