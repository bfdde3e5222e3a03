use super::Tool;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Parameters for budget advice
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct BudgetParams {
    /// Monthly revenue (MSME) or income (consumer) in rupees
    pub revenue_or_income: f64,
    /// Monthly expenses in rupees
    pub expenses: f64,
}

/// Surplus/deficit budget advisor for MSMEs or personal finances
#[derive(Debug)]
pub struct BudgetTool;

impl Default for BudgetTool {
    fn default() -> Self {
        Self::new()
    }
}

impl BudgetTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for BudgetTool {
    fn name(&self) -> &'static str {
        "budget_advice"
    }

    fn description(&self) -> &'static str {
        "Budget advice for MSMEs or personal finances"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "revenue_or_income": {"type": "number", "description": "Monthly revenue or income in rupees"},
                "expenses": {"type": "number", "description": "Monthly expenses in rupees"}
            },
            "required": ["revenue_or_income", "expenses"]
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
            let params: BudgetParams = serde_json::from_value(parameters).map_err(|e| {
                crate::AgentError::ToolExecution(format!("Invalid parameters: {}", e))
            })?;

            let savings = params.revenue_or_income - params.expenses;

            let advice = if savings > 0.0 {
                format!(
                    "Surplus: ₹{}. Save 20% for emergencies, invest 30%.",
                    savings
                )
            } else {
                format!("Deficit: ₹{}. Reduce non-essentials by 15%.", -savings)
            };

            Ok(serde_json::json!({
                "savings": savings,
                "advice": advice
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_surplus() {
        let tool = BudgetTool::new();
        let result = tool
            .execute(json!({"revenue_or_income": 50000.0, "expenses": 30000.0}))
            .await
            .unwrap();

        assert_eq!(result["savings"], 20000.0);
        let advice = result["advice"].as_str().unwrap();
        assert!(advice.starts_with("Surplus: ₹20000"));
        assert!(advice.contains("20%"));
        assert!(advice.contains("30%"));
    }

    #[tokio::test]
    async fn test_deficit() {
        let tool = BudgetTool::new();
        let result = tool
            .execute(json!({"revenue_or_income": 20000.0, "expenses": 25000.0}))
            .await
            .unwrap();

        assert_eq!(result["savings"], -5000.0);
        let advice = result["advice"].as_str().unwrap();
        assert!(advice.starts_with("Deficit: ₹5000"));
        assert!(advice.contains("15%"));
    }

    #[tokio::test]
    async fn test_break_even_is_deficit_path() {
        let tool = BudgetTool::new();
        let result = tool
            .execute(json!({"revenue_or_income": 10000.0, "expenses": 10000.0}))
            .await
            .unwrap();

        let advice = result["advice"].as_str().unwrap();
        assert!(advice.starts_with("Deficit:"));
    }
}
