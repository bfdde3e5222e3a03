use super::Tool;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Parameters for personal loan advice
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct LoanParams {
    /// Loan principal in rupees
    pub principal: f64,
    /// Annual interest rate in percent, e.g. 12 for 12%
    pub interest_rate: f64,
    /// Loan tenure in months
    pub tenure_months: u32,
}

/// EMI calculator and personal loan advice for consumers
#[derive(Debug)]
pub struct LoanAdviceTool;

impl Default for LoanAdviceTool {
    fn default() -> Self {
        Self::new()
    }
}

impl LoanAdviceTool {
    pub fn new() -> Self {
        Self
    }
}

/// Standard amortized EMI. A zero rate degenerates to straight principal
/// division; tenure must be at least one month.
pub fn monthly_emi(principal: f64, annual_rate_percent: f64, tenure_months: u32) -> f64 {
    let n = tenure_months as f64;
    let monthly_rate = annual_rate_percent / 12.0 / 100.0;

    if monthly_rate == 0.0 {
        return principal / n;
    }

    let growth = (1.0 + monthly_rate).powi(tenure_months as i32);
    principal * monthly_rate * growth / (growth - 1.0)
}

impl Tool for LoanAdviceTool {
    fn name(&self) -> &'static str {
        "personal_loan_advice"
    }

    fn description(&self) -> &'static str {
        "Advice on personal loans for consumers, including the monthly EMI"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "principal": {"type": "number", "description": "Loan principal in rupees"},
                "interest_rate": {"type": "number", "description": "Annual interest rate in percent"},
                "tenure_months": {"type": "integer", "description": "Loan tenure in months"}
            },
            "required": ["principal", "interest_rate", "tenure_months"]
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
            let params: LoanParams = serde_json::from_value(parameters).map_err(|e| {
                crate::AgentError::ToolExecution(format!("Invalid parameters: {}", e))
            })?;

            if params.tenure_months == 0 {
                return Err(crate::AgentError::ToolExecution(
                    "Tenure must be at least one month".to_string(),
                ));
            }

            let emi = monthly_emi(params.principal, params.interest_rate, params.tenure_months);
            let total_interest = emi * params.tenure_months as f64 - params.principal;

            let formatted = format!(
                "EMI: ₹{:.2}. Total interest: ₹{:.2}. Ensure rate <15% per RBI guidelines.",
                emi, total_interest
            );

            Ok(serde_json::json!({
                "emi": emi,
                "total_interest": total_interest,
                "formatted": formatted
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_emi_reference_case() {
        // 50000 at 12% over 24 months
        let emi = monthly_emi(50000.0, 12.0, 24);
        assert!((emi - 2353.67).abs() < 0.01, "emi was {}", emi);
    }

    #[test]
    fn test_emi_zero_rate_is_straight_division() {
        let emi = monthly_emi(24000.0, 0.0, 24);
        assert!((emi - 1000.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_loan_tool_output() {
        let tool = LoanAdviceTool::new();
        let result = tool
            .execute(json!({
                "principal": 50000.0,
                "interest_rate": 12.0,
                "tenure_months": 24
            }))
            .await
            .unwrap();

        let emi = result["emi"].as_f64().unwrap();
        assert!((emi - 2353.67).abs() < 0.01);

        let total_interest = result["total_interest"].as_f64().unwrap();
        assert!((total_interest - (emi * 24.0 - 50000.0)).abs() < 1e-6);

        let formatted = result["formatted"].as_str().unwrap();
        assert!(formatted.contains("EMI: ₹2353.67"));
        assert!(formatted.contains("RBI"));
    }

    #[tokio::test]
    async fn test_zero_tenure_is_an_error() {
        let tool = LoanAdviceTool::new();
        let result = tool
            .execute(json!({
                "principal": 50000.0,
                "interest_rate": 12.0,
                "tenure_months": 0
            }))
            .await;

        assert!(result.is_err());
    }
}
