use super::{tool::ToolRegistry, Tool};
use crate::{AgentError, Result};
use serde_json::Value;

/// Factory for creating and managing function/tool execution
#[derive(Debug)]
pub struct FunctionFactory {
    registry: ToolRegistry,
}

impl FunctionFactory {
    /// Create a new function factory
    pub fn new() -> Self {
        Self {
            registry: ToolRegistry::new(),
        }
    }

    /// Create a factory with the four finance/legal tools registered
    pub fn with_default_tools() -> Self {
        let mut factory = Self::new();
        factory.register_tool(super::InvoiceTool::new());
        factory.register_tool(super::BudgetTool::new());
        factory.register_tool(super::ContractReviewTool::new());
        factory.register_tool(super::LoanAdviceTool::new());
        factory
    }

    /// Register a tool with the factory
    pub fn register_tool<T: Tool + 'static>(&mut self, tool: T) {
        self.registry.register(tool);
    }

    /// Execute a function call by name
    pub async fn execute_function(&self, function_name: &str, parameters: Value) -> Result<Value> {
        let tool = self
            .registry
            .get(function_name)
            .ok_or_else(|| AgentError::ToolNotFound(function_name.to_string()))?;

        tool.execute(parameters).await
    }

    /// Get all available tool definitions for function calling
    pub fn chat_tools(&self) -> Vec<Value> {
        self.registry.to_chat_tools()
    }

    /// Check if a function exists
    pub fn has_function(&self, name: &str) -> bool {
        self.registry.get(name).is_some()
    }
}

impl Default for FunctionFactory {
    fn default() -> Self {
        Self::new()
    }
}
