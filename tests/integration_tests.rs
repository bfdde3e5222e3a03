use finlegal_agent::{
    tools::{BudgetTool, ContractReviewTool, InvoiceTool, LoanAdviceTool},
    AgentStep, ConversationMemory, FunctionFactory, Tool,
};
use serde_json::json;

#[tokio::test]
async fn test_invoice_tool() {
    let invoice = InvoiceTool::new();

    let params = json!({
        "amount": 10000.0,
        "description": "services",
        "gst_rate": 0.18
    });

    let result = invoice.execute(params).await.unwrap();
    assert_eq!(result["subtotal"], 10000.0);
    assert!((result["total"].as_f64().unwrap() - 11800.0).abs() < 1e-6);
    assert!(result["formatted"]
        .as_str()
        .unwrap()
        .starts_with("Invoice:"));
}

#[tokio::test]
async fn test_budget_tool_surplus_and_deficit() {
    let budget = BudgetTool::new();

    let surplus = budget
        .execute(json!({"revenue_or_income": 80000.0, "expenses": 50000.0}))
        .await
        .unwrap();
    assert_eq!(surplus["savings"], 30000.0);
    assert!(surplus["advice"].as_str().unwrap().contains("Surplus"));

    let deficit = budget
        .execute(json!({"revenue_or_income": 40000.0, "expenses": 50000.0}))
        .await
        .unwrap();
    assert_eq!(deficit["savings"], -10000.0);
    assert!(deficit["advice"].as_str().unwrap().contains("Deficit"));
}

#[tokio::test]
async fn test_contract_tool_keyword_scan() {
    let contract = ContractReviewTool::new();

    let result = contract
        .execute(json!({
            "contract_text": "The borrower pays Interest monthly; a Penalty applies on late payment."
        }))
        .await
        .unwrap();

    let risks = result["risks"].as_array().unwrap();
    assert_eq!(risks.len(), 2);

    let clean = contract
        .execute(json!({"contract_text": "Simple service agreement."}))
        .await
        .unwrap();
    assert_eq!(clean["risk_summary"], "Low");
}

#[tokio::test]
async fn test_loan_tool_emi() {
    let loan = LoanAdviceTool::new();

    let result = loan
        .execute(json!({
            "principal": 50000.0,
            "interest_rate": 12.0,
            "tenure_months": 24
        }))
        .await
        .unwrap();

    assert!((result["emi"].as_f64().unwrap() - 2353.67).abs() < 0.01);

    // Zero rate degenerates to straight division instead of faulting
    let zero_rate = loan
        .execute(json!({
            "principal": 24000.0,
            "interest_rate": 0.0,
            "tenure_months": 12
        }))
        .await
        .unwrap();
    assert!((zero_rate["emi"].as_f64().unwrap() - 2000.0).abs() < 1e-9);

    // Zero tenure is a tool error, not a NaN answer
    let zero_tenure = loan
        .execute(json!({
            "principal": 24000.0,
            "interest_rate": 12.0,
            "tenure_months": 0
        }))
        .await;
    assert!(zero_tenure.is_err());
}

#[tokio::test]
async fn test_function_factory() {
    let factory = FunctionFactory::with_default_tools();

    assert!(factory.has_function("generate_invoice"));
    assert!(factory.has_function("budget_advice"));
    assert!(factory.has_function("review_contract"));
    assert!(factory.has_function("personal_loan_advice"));
    assert!(!factory.has_function("nonexistent"));

    let result = factory
        .execute_function(
            "budget_advice",
            json!({"revenue_or_income": 100.0, "expenses": 60.0}),
        )
        .await
        .unwrap();
    assert_eq!(result["savings"], 40.0);

    let missing = factory.execute_function("nonexistent", json!({})).await;
    assert!(missing.is_err());
}

#[test]
fn test_chat_tool_definitions() {
    let factory = FunctionFactory::with_default_tools();
    let tools = factory.chat_tools();

    assert_eq!(tools.len(), 4);
    for tool in &tools {
        assert_eq!(tool["type"], "function");
        assert!(tool["function"]["parameters"]["properties"].is_object());
    }
}

#[test]
fn test_tool_schemas() {
    let invoice = InvoiceTool::new();
    let loan = LoanAdviceTool::new();

    let invoice_schema = invoice.parameters_schema();
    assert!(invoice_schema.is_object());
    assert!(invoice_schema.get("properties").is_some());

    let loan_schema = loan.parameters_schema();
    assert!(loan_schema.is_object());
    assert!(loan_schema.get("properties").is_some());
}

#[test]
fn test_error_handling() {
    use finlegal_agent::AgentError;

    let error = AgentError::ToolExecution("Test error".to_string());
    assert_eq!(error.error_code(), "TOOL_EXECUTION_ERROR");
    assert!(error.to_string().contains("Test error"));

    let payload = error.to_error_payload();
    assert_eq!(payload["error"]["code"], "TOOL_EXECUTION_ERROR");
    assert_eq!(payload["error"]["retryable"], false);
}

#[test]
fn test_memory_message_roundtrip() {
    let mut memory = ConversationMemory::with_default_system();
    memory.add_step(AgentStep::Task {
        content: "Generate invoice for ₹10000 services in English".to_string(),
    });
    memory.add_step(AgentStep::Action {
        tool_name: "generate_invoice".to_string(),
        tool_call_id: "call_1".to_string(),
        arguments: json!({"amount": 10000.0, "description": "services"}),
    });
    memory.add_step(AgentStep::Observation {
        tool_call_id: "call_1".to_string(),
        result: "{\"total\": 11800.0}".to_string(),
        is_error: false,
    });
    memory.add_step(AgentStep::FinalAnswer {
        answer: "Your invoice total is ₹11800.".to_string(),
    });

    let messages = memory.as_messages();
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[2]["role"], "assistant");
    assert_eq!(
        messages[2]["tool_calls"][0]["function"]["name"],
        "generate_invoice"
    );
    assert_eq!(messages[3]["role"], "tool");
    assert_eq!(messages[3]["tool_call_id"], "call_1");
    assert_eq!(messages[4]["role"], "assistant");
}
