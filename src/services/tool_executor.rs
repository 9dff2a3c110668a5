use crate::errors::ToolError;
use crate::mcp::catalog::{tool_names, validate_tool_args};
use crate::resources::endpoints::{endpoint_for, EndpointKind, EndpointSpec};
use crate::resources::{envelope, upload};
use crate::services::gateway::{ApiTransport, RequestOptions};
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use crate::utils::suggest::suggest;
use serde_json::Value;
use std::sync::Arc;

/// Resolves a tool call against the endpoint table and runs it through the
/// gateway. Holds no per-call state; concurrent calls are independent.
pub struct ToolExecutor {
    logger: Logger,
    validation: Validation,
    transport: Arc<dyn ApiTransport>,
}

impl ToolExecutor {
    pub fn new(logger: Logger, transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            logger: logger.child("executor"),
            validation: Validation::new(),
            transport,
        }
    }

    /// Lookup, validate, encode, send, decode. Every failure before the
    /// `issue` call is local: no network I/O has happened yet.
    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let Some(spec) = endpoint_for(name) else {
            return Err(unknown_tool_error(name));
        };
        validate_tool_args(name, &args)?;
        self.logger.debug(&format!("call {}", name), None);

        match spec.kind {
            EndpointKind::Upload => {
                upload::upload(
                    self.transport.as_ref(),
                    &self.logger,
                    &self.validation,
                    spec,
                    &args,
                )
                .await
            }
            EndpointKind::List => {
                let envelope_value = self.issue_without_body(spec, &args).await?;
                Ok(envelope::decode_list(envelope_value))
            }
            EndpointKind::Get => {
                let envelope_value = self.issue_without_body(spec, &args).await?;
                Ok(envelope::decode_single(envelope_value))
            }
            EndpointKind::Create | EndpointKind::Update => {
                let body = envelope::write_envelope(spec, &args, &self.validation)?;
                let path = envelope::render_path(spec.path, &args, &self.validation)?;
                let query = envelope::render_query(spec.query, &args);
                let envelope_value = self
                    .transport
                    .issue(
                        &path,
                        spec.method(),
                        RequestOptions {
                            query,
                            json_body: Some(body),
                            ..Default::default()
                        },
                    )
                    .await?;
                Ok(envelope::decode_single(envelope_value))
            }
            EndpointKind::Delete => {
                self.issue_without_body(spec, &args).await?;
                Ok(serde_json::json!({ "success": true }))
            }
        }
    }

    async fn issue_without_body(
        &self,
        spec: &EndpointSpec,
        args: &Value,
    ) -> Result<Value, ToolError> {
        let path = envelope::render_path(spec.path, args, &self.validation)?;
        let query = envelope::render_query(spec.query, args);
        self.transport
            .issue(
                &path,
                spec.method(),
                RequestOptions {
                    query,
                    ..Default::default()
                },
            )
            .await
    }
}

fn unknown_tool_error(name: &str) -> ToolError {
    let known = tool_names();
    let suggestions = suggest(name, &known, 3);
    let mut err = ToolError::not_found(format!("Unknown tool: {}", name));
    if !suggestions.is_empty() {
        err = err.with_hint(format!("Did you mean: {}?", suggestions.join(", ")));
    }
    err
}
