use super::Tool;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

fn default_gst_rate() -> f64 {
    0.18
}

/// Parameters for invoice generation
#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct InvoiceParams {
    /// Pre-tax amount in rupees
    pub amount: f64,
    /// What the invoice is for
    pub description: String,
    /// GST rate as a fraction, e.g. 0.18 for 18%
    #[serde(default = "default_gst_rate")]
    pub gst_rate: f64,
}

/// Generates a GST invoice for MSMEs or consumers
#[derive(Debug)]
pub struct InvoiceTool;

impl Default for InvoiceTool {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for InvoiceTool {
    fn name(&self) -> &'static str {
        "generate_invoice"
    }

    fn description(&self) -> &'static str {
        "Generate an invoice with GST for MSMEs or consumers"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "amount": {"type": "number", "description": "Pre-tax amount in rupees"},
                "description": {"type": "string", "description": "What the invoice is for"},
                "gst_rate": {"type": "number", "description": "GST rate as a fraction, default 0.18"}
            },
            "required": ["amount", "description"]
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
            let params: InvoiceParams = serde_json::from_value(parameters).map_err(|e| {
                crate::AgentError::ToolExecution(format!("Invalid parameters: {}", e))
            })?;

            let subtotal = params.amount;
            let gst = subtotal * params.gst_rate;
            let total = subtotal + gst;

            let formatted = format!(
                "Invoice:\nDescription: {}\nSubtotal: ₹{}\nGST ({:.1}%): ₹{}\nTotal: ₹{}",
                params.description,
                subtotal,
                params.gst_rate * 100.0,
                gst,
                total
            );

            Ok(serde_json::json!({
                "description": params.description,
                "subtotal": subtotal,
                "gst_rate": params.gst_rate,
                "gst": gst,
                "total": total,
                "formatted": formatted
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_invoice_total() {
        let tool = InvoiceTool::new();
        let result = tool
            .execute(json!({
                "amount": 10000.0,
                "description": "services",
                "gst_rate": 0.18
            }))
            .await
            .unwrap();

        assert_eq!(result["subtotal"], 10000.0);
        let total = result["total"].as_f64().unwrap();
        assert!((total - 10000.0 * 1.18).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_invoice_default_gst_rate() {
        let tool = InvoiceTool::new();
        let result = tool
            .execute(json!({
                "amount": 500.0,
                "description": "consulting"
            }))
            .await
            .unwrap();

        assert_eq!(result["gst_rate"], 0.18);
        let formatted = result["formatted"].as_str().unwrap();
        assert!(formatted.contains("GST (18.0%)"));
        assert!(formatted.contains("consulting"));
    }

    #[tokio::test]
    async fn test_invoice_rejects_missing_amount() {
        let tool = InvoiceTool::new();
        let result = tool.execute(json!({"description": "services"})).await;
        assert!(result.is_err());
    }
}
