use super::steps::AgentStep;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// System prompt for the finance/legal assistant. The closing instruction is
/// required by the execution loop's `final_answer` termination protocol.
pub const SYSTEM_PROMPT: &str = "You are FinLegal AI, assisting MSMEs and consumers in India with finance and legal aid. \
Respond in the user's preferred language (Hindi/English). \
Use tools for facts; verify to avoid errors. \
Financial: budgets, invoices, loans. \
Legal: contract reviews, simple advice (not a legal substitute). \
If the matter is complex, recommend professionals. \
When you are ready to give the final response, you MUST call the `final_answer` tool with an `answer` string instead of replying directly.";

/// Conversation buffer for one session. Holds the agent's steps across
/// submissions and converts them to chat-completions message format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMemory {
    steps: Vec<AgentStep>,
    system_prompt: Option<String>,
}

impl ConversationMemory {
    /// Create a new memory with optional system prompt
    pub fn new(system_prompt: Option<String>) -> Self {
        Self {
            steps: Vec::new(),
            system_prompt,
        }
    }

    /// Create memory with the finance/legal system prompt
    pub fn with_default_system() -> Self {
        Self::new(Some(SYSTEM_PROMPT.to_string()))
    }

    /// Add a step to memory
    pub fn add_step(&mut self, step: AgentStep) {
        let description = step.describe();
        info!(target: "finlegal::steps", "{}", description);
        self.steps.push(step);
    }

    /// Get all steps
    pub fn steps(&self) -> &[AgentStep] {
        &self.steps
    }

    /// Get the last step
    pub fn last_step(&self) -> Option<&AgentStep> {
        self.steps.last()
    }

    /// Convert memory to chat-completions message format
    pub fn as_messages(&self) -> Vec<Value> {
        let mut messages = Vec::new();

        if let Some(system_prompt) = &self.system_prompt {
            messages.push(serde_json::json!({
                "role": "system",
                "content": system_prompt
            }));
        }

        for step in &self.steps {
            messages.push(step.to_message());
        }

        messages
    }

    /// Clear all steps but keep system prompt
    pub fn clear_steps(&mut self) {
        self.steps.clear();
    }

    /// Get number of steps
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Check if memory is empty (excluding system prompt)
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Count tool-call steps
    pub fn count_actions(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, AgentStep::Action { .. }))
            .count()
    }

    /// Count tool-result steps
    pub fn count_observations(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, AgentStep::Observation { .. }))
            .count()
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::with_default_system()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_creation() {
        let memory = ConversationMemory::new(Some("System".to_string()));
        assert_eq!(memory.step_count(), 0);
        assert!(memory.is_empty());
    }

    #[test]
    fn test_add_steps() {
        let mut memory = ConversationMemory::default();
        memory.add_step(AgentStep::Task {
            content: "Generate invoice for 10000 services".to_string(),
        });
        assert_eq!(memory.step_count(), 1);
        assert!(!memory.is_empty());
    }

    #[test]
    fn test_as_messages() {
        let mut memory = ConversationMemory::with_default_system();
        memory.add_step(AgentStep::Task {
            content: "Hello".to_string(),
        });

        let messages = memory.as_messages();
        assert_eq!(messages.len(), 2); // system + task
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
    }

    #[test]
    fn test_memory_persists_across_turns() {
        let mut memory = ConversationMemory::with_default_system();
        memory.add_step(AgentStep::Task {
            content: "first".to_string(),
        });
        memory.add_step(AgentStep::FinalAnswer {
            answer: "one".to_string(),
        });
        memory.add_step(AgentStep::Task {
            content: "second".to_string(),
        });

        let messages = memory.as_messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2]["role"], "assistant");
        assert_eq!(messages[3]["content"], "second");
    }

    #[test]
    fn test_clear_steps_keeps_system() {
        let mut memory = ConversationMemory::with_default_system();
        memory.add_step(AgentStep::Task {
            content: "query".to_string(),
        });
        memory.clear_steps();
        assert!(memory.is_empty());
        assert_eq!(memory.as_messages().len(), 1);
    }

    #[test]
    fn test_count_actions() {
        let mut memory = ConversationMemory::default();
        memory.add_step(AgentStep::Action {
            tool_name: "generate_invoice".to_string(),
            tool_call_id: "1".to_string(),
            arguments: Value::Null,
        });
        memory.add_step(AgentStep::Action {
            tool_name: "budget_advice".to_string(),
            tool_call_id: "2".to_string(),
            arguments: Value::Null,
        });
        assert_eq!(memory.count_actions(), 2);
    }
}
