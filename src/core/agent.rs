use crate::{
    error::{AgentError, Result},
    services::mistral_client::MistralClient,
    tools::FunctionFactory,
};
use serde_json::Value;
use std::time::Duration;

/// Main agent wiring the Mistral chat-completions API to the finance/legal
/// tool registry. The execution loop lives in `services::execution`.
#[derive(Debug)]
pub struct Agent {
    client: MistralClient,
    function_factory: FunctionFactory,
    model: String,
    temperature: f32,
    max_iterations: usize,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl Agent {
    pub fn new(api_key: String, function_factory: FunctionFactory) -> Self {
        Self {
            client: MistralClient::new(api_key),
            function_factory,
            model: "mistral-large-latest".to_string(),
            temperature: 0.3,
            max_iterations: 10,
            max_tokens: Some(1024),
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client.set_base_url(base_url);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn function_factory(&self) -> &FunctionFactory {
        &self.function_factory
    }

    pub(crate) fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn temperature(&self) -> f32 {
        self.temperature
    }

    pub(crate) fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub(crate) fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) async fn make_raw_request(&self, request_body: &Value) -> Result<Value> {
        self.client.chat_completion(request_body, self.timeout).await
    }

    /// Build an agent from environment variables, with the default tool set
    /// registered by the caller.
    pub fn from_env(function_factory: FunctionFactory) -> Result<Self> {
        let api_key = std::env::var("MISTRAL_API_KEY").map_err(|_| {
            AgentError::Config(
                "MISTRAL_API_KEY environment variable must be set before creating an Agent"
                    .to_string(),
            )
        })?;
        let mut agent = Self::new(api_key, function_factory);
        if let Ok(base_url) = std::env::var("MISTRAL_BASE_URL") {
            agent.client.set_base_url(base_url);
        }
        Ok(agent)
    }
}
