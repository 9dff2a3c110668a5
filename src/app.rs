use crate::config::Config;
use crate::errors::ToolError;
use crate::mcp::catalog::{tool_by_name, tool_catalog};
use crate::resources::endpoints::{endpoint_for, endpoints};
use crate::services::gateway::HttpGateway;
use crate::services::logger::Logger;
use crate::services::tool_executor::ToolExecutor;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    /// The catalog and the endpoint table are maintained side by side; any
    /// drift between them is a server wiring bug caught at startup.
    fn validate_tool_wiring() -> Result<(), ToolError> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| endpoint_for(&tool.name).is_none())
            .map(|tool| tool.name.clone())
            .collect();
        let mut orphaned: Vec<String> = endpoints()
            .iter()
            .filter(|spec| tool_by_name(spec.name).is_none())
            .map(|spec| spec.name.to_string())
            .collect();
        if missing.is_empty() && orphaned.is_empty() {
            return Ok(());
        }
        missing.sort();
        orphaned.sort();
        Err(ToolError::internal("Tool wiring is incomplete")
            .with_hint(
                "Every tool in tool_catalog.json must have an endpoint entry and vice versa.",
            )
            .with_details(serde_json::json!({
                "missing_endpoints": missing,
                "orphaned_endpoints": orphaned,
            })))
    }

    pub fn initialize() -> Result<Self, ToolError> {
        let logger = Logger::new("baklib");
        Self::validate_tool_wiring()?;
        let config = Config::from_env()?;
        let gateway = HttpGateway::new(logger.clone(), config)?;
        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), Arc::new(gateway)));
        Ok(Self {
            logger,
            tool_executor,
        })
    }
}
