//! finlegal-agent: finance and legal aid agent for MSMEs and consumers
//!
//! Wires the Mistral chat-completions API to a small set of finance/legal
//! calculator tools via native function calling, with an in-process
//! conversation buffer, a one-shot CLI, and an embedded web form.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use finlegal_agent::{tools::FunctionFactory, Agent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_key = std::env::var("MISTRAL_API_KEY")?;
//!     let agent = Agent::new(api_key, FunctionFactory::with_default_tools());
//!
//!     let response = agent.run("Advice on ₹50000 loan at 12% for 24 months").await?;
//!     println!("{}", response);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod error;
pub(crate) mod services;
pub mod tools;
pub mod types;
pub mod web;

pub use core::{
    Agent, AgentStep, ConversationMemory, RunResult, TokenUsage, ToolCall, ToolExecution,
    ToolOutput, SYSTEM_PROMPT,
};
pub use error::{AgentError, Result};
pub use tools::{
    BudgetTool, ContractReviewTool, FunctionFactory, InvoiceTool, LoanAdviceTool, Tool,
};

pub use core as agent;

#[cfg(feature = "cli")]
pub mod cli;
