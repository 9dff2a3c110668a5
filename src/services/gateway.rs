use crate::config::Config;
use crate::constants::upload as upload_fields;
use crate::errors::ToolError;
use crate::services::logger::Logger;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use url::Url;

/// Multipart payload for the DAM upload path. The remote parses uploads with
/// jsonapi_parse over form fields, so the field names are the bracketed
/// `data[type]` / `data[attributes][file]` pair rather than a JSON body.
#[derive(Debug, Clone)]
pub struct MultipartFile {
    pub type_name: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// At most one of `json_body` / `multipart` is set per request.
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub json_body: Option<Value>,
    pub multipart: Option<MultipartFile>,
}

/// Seam between tool handlers and the network. Tests substitute a recording
/// implementation here; production wires in [`HttpGateway`].
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn issue(
        &self,
        path: &str,
        method: Method,
        options: RequestOptions,
    ) -> Result<Value, ToolError>;
}

/// One outbound HTTP call per invocation. No retry and no explicit timeout:
/// a hung request blocks the calling tool until the transport gives up.
pub struct HttpGateway {
    logger: Logger,
    config: Config,
    client: Client,
}

impl HttpGateway {
    pub fn new(logger: Logger, config: Config) -> Result<Self, ToolError> {
        let client = Client::builder()
            .build()
            .map_err(|err| ToolError::internal(format!("Failed to build HTTP client: {}", err)))?;
        Ok(Self {
            logger: logger.child("gateway"),
            config,
            client,
        })
    }

    fn build_url(&self, path: &str, query: &[(String, String)]) -> Result<Url, ToolError> {
        let mut url = Url::parse(&format!("{}{}", self.config.base_url(), path))
            .map_err(|err| ToolError::internal(format!("Invalid request URL: {}", err)))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl ApiTransport for HttpGateway {
    async fn issue(
        &self,
        path: &str,
        method: Method,
        options: RequestOptions,
    ) -> Result<Value, ToolError> {
        let url = self.build_url(path, &options.query)?;
        self.logger.debug(&format!("{} {}", method, url), None);

        let mut request = self
            .client
            .request(method, url)
            // Raw token, no Bearer prefix; the API rejects a prefixed value.
            .header("Authorization", self.config.token());

        if let Some(file) = options.multipart {
            let part = reqwest::multipart::Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)
                .map_err(|err| ToolError::internal(format!("Invalid media type: {}", err)))?;
            let form = reqwest::multipart::Form::new()
                .text(upload_fields::TYPE_FIELD, file.type_name)
                .part(upload_fields::FILE_FIELD, part);
            request = request.multipart(form);
        } else if let Some(body) = options.json_body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| ToolError::io(format!("Request failed: {}", err)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::remote(status.as_u16(), &body));
        }

        // DELETE and friends answer with an empty body.
        if status.as_u16() == 204 || response.content_length() == Some(0) {
            return Ok(serde_json::json!({ "success": true }));
        }

        let text = response
            .text()
            .await
            .map_err(|err| ToolError::io(format!("Failed to read response body: {}", err)))?;
        serde_json::from_str(&text)
            .map_err(|err| ToolError::internal(format!("Invalid JSON in API response: {}", err)))
    }
}
