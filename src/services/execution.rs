use crate::{
    core::{
        agent::Agent,
        memory::ConversationMemory,
        steps::AgentStep,
        tool_call::{ToolCall, ToolExecution},
    },
    error::{AgentError, Result},
    services::{
        mistral_client::ChatCompletionRequest,
        tool_call_utils::{
            extract_arguments_str, extract_function_info, extract_tool_call_id,
            parse_function_arguments,
        },
    },
    types::result::{RunResult, TokenUsage},
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Instant;
use tokio::time::timeout;
use tracing::debug;

/// Arguments for the final_answer tool
#[derive(Deserialize)]
struct FinalAnswerArguments {
    answer: String,
}

/// Definition of the synthetic tool the model must call to finish a turn
pub(crate) fn final_answer_tool_definition() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": "final_answer",
            "description": "Signal that the agent has completed the task by providing the final answer.",
            "parameters": {
                "type": "object",
                "properties": {
                    "answer": {
                        "type": "string",
                        "description": "Final response for the user"
                    }
                },
                "required": ["answer"]
            }
        }
    })
}

fn reminder_message(content: String) -> Value {
    json!({
        "role": "system",
        "content": content
    })
}

impl Agent {
    /// One-shot run with a fresh conversation. Returns the final answer text.
    pub async fn run(&self, prompt: &str) -> Result<String> {
        let mut memory = ConversationMemory::with_default_system();
        let result = self.run_turn(&mut memory, prompt).await?;
        Ok(result.output)
    }

    /// Run one submission against a persistent conversation. Appends the task,
    /// drives the tool-calling loop to a `final_answer`, and records the
    /// answer in memory so later turns see the full history.
    ///
    /// Corrective reminders (model replied with plain text instead of calling
    /// `final_answer`) are kept out of memory; they only live for the
    /// iterations of the current turn.
    pub async fn run_turn(
        &self,
        memory: &mut ConversationMemory,
        input: &str,
    ) -> Result<RunResult> {
        let start_time = Instant::now();
        let turn_start = memory.step_count();

        memory.add_step(AgentStep::Task {
            content: input.to_string(),
        });

        let mut reminders: Vec<Value> = Vec::new();
        let mut usage_total: Option<TokenUsage> = None;
        let mut iteration = 0;

        while iteration < self.max_iterations() {
            iteration += 1;

            let mut messages = memory.as_messages();
            messages.extend(reminders.iter().cloned());

            let mut tools = self.function_factory().chat_tools();
            tools.push(final_answer_tool_definition());

            let request_body = ChatCompletionRequest::new(self.model().to_owned(), messages)
                .with_tools(tools)
                .with_tool_choice(json!("auto"))
                .with_temperature(self.temperature())
                .with_max_tokens(self.max_tokens())
                .into_value();

            let response = timeout(self.timeout(), self.make_raw_request(&request_body))
                .await
                .map_err(|_| AgentError::Timeout("Mistral API call timed out".to_string()))??;

            let assistant_message = extract_assistant_message(&response)?;
            accumulate_usage(&mut usage_total, &response);

            let tool_calls_array = assistant_message
                .get("tool_calls")
                .and_then(|value| value.as_array())
                .cloned()
                .unwrap_or_default();

            if tool_calls_array.is_empty() {
                let answer = assistant_message
                    .get("content")
                    .and_then(|value| value.as_str())
                    .unwrap_or("")
                    .trim()
                    .to_string();

                let content = if answer.is_empty() {
                    "Reminder: You must call the `final_answer` tool with the completed answer to finish.".to_string()
                } else {
                    format!(
                        "Reminder: Do not respond directly. Call the `final_answer` tool with the final answer instead of: {}",
                        answer
                    )
                };

                reminders.push(reminder_message(content));
                continue;
            }

            let turn_has_final_answer = tool_calls_array.iter().any(|tool_call| {
                tool_call
                    .get("function")
                    .and_then(|f| f.get("name"))
                    .and_then(|name| name.as_str())
                    .map(|name| name == "final_answer")
                    .unwrap_or(false)
            });

            if turn_has_final_answer && tool_calls_array.len() > 1 {
                reminders.push(reminder_message(
                    "Reminder: `final_answer` must be the only tool call in a single turn."
                        .to_string(),
                ));
                continue;
            }

            for tool_call in &tool_calls_array {
                let tool_call_id = extract_tool_call_id(tool_call);

                let (function, function_name_opt) = match extract_function_info(tool_call) {
                    Some(info) => info,
                    None => {
                        reminders.push(reminder_message(
                            "Reminder: a tool call was missing its function object.".to_string(),
                        ));
                        continue;
                    }
                };

                let function_name = match function_name_opt {
                    Some(name) if !name.is_empty() => name,
                    _ => {
                        reminders.push(reminder_message(
                            "Reminder: a tool call was missing its function name.".to_string(),
                        ));
                        continue;
                    }
                };

                let arguments_str = extract_arguments_str(&function);
                let parsed_arguments = parse_function_arguments(arguments_str, &function_name);

                if function_name == "final_answer" {
                    let arguments_json = match parsed_arguments {
                        Ok(value) => value,
                        Err(err) => {
                            reminders.push(reminder_message(format!(
                                "Reminder: `final_answer` arguments were invalid: {}",
                                err
                            )));
                            continue;
                        }
                    };

                    let args: FinalAnswerArguments = match serde_json::from_value(arguments_json)
                    {
                        Ok(args) => args,
                        Err(err) => {
                            reminders.push(reminder_message(format!(
                                "Reminder: `final_answer` requires an `answer` string: {}",
                                err
                            )));
                            continue;
                        }
                    };

                    memory.add_step(AgentStep::FinalAnswer {
                        answer: args.answer.clone(),
                    });

                    return Ok(RunResult::new(
                        args.answer,
                        memory.steps()[turn_start..].to_vec(),
                        usage_total,
                        start_time.elapsed(),
                        iteration,
                    ));
                }

                // Regular tool execution
                match parsed_arguments {
                    Ok(arguments_json) => {
                        memory.add_step(AgentStep::Action {
                            tool_name: function_name.clone(),
                            tool_call_id: tool_call_id.to_string(),
                            arguments: arguments_json.clone(),
                        });

                        let execution = ToolExecution::start(ToolCall::new(
                            tool_call_id.to_string(),
                            function_name.clone(),
                            arguments_json.clone(),
                        ));

                        let output = match self
                            .function_factory()
                            .execute_function(&function_name, arguments_json)
                            .await
                        {
                            Ok(result) => execution.complete(result, false),
                            Err(e) => execution.complete(e.to_error_payload(), true),
                        };

                        debug!(
                            target: "finlegal::tools",
                            "{} finished in {:?}ms",
                            output.tool_name, output.duration_ms
                        );

                        memory.add_step(AgentStep::Observation {
                            tool_call_id: output.tool_call_id.clone(),
                            result: output.output.to_string(),
                            is_error: output.is_error,
                        });
                    }
                    Err(error) => {
                        memory.add_step(AgentStep::Action {
                            tool_name: function_name.clone(),
                            tool_call_id: tool_call_id.to_string(),
                            arguments: Value::Object(Default::default()),
                        });
                        memory.add_step(AgentStep::Observation {
                            tool_call_id: tool_call_id.to_string(),
                            result: error.to_error_payload().to_string(),
                            is_error: true,
                        });
                    }
                }
            }
        }

        Err(AgentError::MaxIterations(self.max_iterations()))
    }
}

fn extract_assistant_message(response: &Value) -> Result<Value> {
    let choices = response
        .get("choices")
        .and_then(|value| value.as_array())
        .ok_or_else(|| {
            AgentError::Api("Missing 'choices' array in completion response".to_string())
        })?;

    let first_choice = choices
        .first()
        .ok_or_else(|| AgentError::Api("Completion response contained no choices".to_string()))?;

    first_choice
        .get("message")
        .cloned()
        .ok_or_else(|| AgentError::Api("Completion response missing assistant message".to_string()))
}

fn accumulate_usage(total: &mut Option<TokenUsage>, response: &Value) {
    let Some(usage) = response.get("usage") else {
        return;
    };

    let turn = TokenUsage {
        prompt_tokens: usage
            .get("prompt_tokens")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32,
        completion_tokens: usage
            .get("completion_tokens")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32,
        total_tokens: usage
            .get("total_tokens")
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32,
    };

    match total {
        Some(existing) => {
            existing.prompt_tokens += turn.prompt_tokens;
            existing.completion_tokens += turn.completion_tokens;
            existing.total_tokens += turn.total_tokens;
        }
        None => *total = Some(turn),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_answer_tool_definition() {
        let def = final_answer_tool_definition();
        assert_eq!(def["function"]["name"], "final_answer");
        assert_eq!(
            def["function"]["parameters"]["required"],
            json!(["answer"])
        );
    }

    #[test]
    fn test_accumulate_usage() {
        let mut total = None;
        let response = json!({
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        });
        accumulate_usage(&mut total, &response);
        accumulate_usage(&mut total, &response);

        let total = total.unwrap();
        assert_eq!(total.prompt_tokens, 20);
        assert_eq!(total.total_tokens, 30);
    }

    #[test]
    fn test_extract_assistant_message_missing_choices() {
        let response = json!({});
        assert!(extract_assistant_message(&response).is_err());
    }
}
