use super::Tool;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Parameters for contract review
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ContractParams {
    /// Full text of the contract to scan
    pub contract_text: String,
}

const SUGGESTIONS: &str =
    "Include arbitration for disputes; consult lawyer for complex cases.";

/// Keyword-based contract risk scan (loans, rentals). Substring matching
/// only, no parsing.
#[derive(Debug)]
pub struct ContractReviewTool;

impl Default for ContractReviewTool {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractReviewTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for ContractReviewTool {
    fn name(&self) -> &'static str {
        "review_contract"
    }

    fn description(&self) -> &'static str {
        "Review contract text for risks (e.g., loans, rentals)"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "contract_text": {"type": "string", "description": "Full text of the contract"}
            },
            "required": ["contract_text"]
        })
    }

    fn execute(
        &self,
        parameters: serde_json::Value,
    ) -> Pin<
        Box<
            dyn std::future::Future<Output = Result<serde_json::Value, crate::AgentError>>
                + Send
                + '_,
        >,
    > {
        Box::pin(async move {
            let params: ContractParams = serde_json::from_value(parameters).map_err(|e| {
                crate::AgentError::ToolExecution(format!("Invalid parameters: {}", e))
            })?;

            let lowered = params.contract_text.to_lowercase();
            let mut risks = Vec::new();

            if lowered.contains("penalty") {
                risks.push("High penalties—negotiate limits per RBI.".to_string());
            }
            if lowered.contains("interest") {
                risks.push(
                    "Verify interest vs. market rates (e.g., 8-15% for personal loans)."
                        .to_string(),
                );
            }

            let risk_summary = if risks.is_empty() {
                "Low".to_string()
            } else {
                risks.join(", ")
            };

            let formatted = format!("Risks: {}\nSuggestions: {}", risk_summary, SUGGESTIONS);

            Ok(serde_json::json!({
                "risks": risks,
                "risk_summary": risk_summary,
                "suggestions": SUGGESTIONS,
                "formatted": formatted
            }))
        })
    }
}
