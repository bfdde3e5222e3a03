//! Web form server for the finance/legal agent
//!
//! Serves an embedded HTML form (language selector + free-text query) and a
//! JSON chat endpoint backed by one process-wide conversation.

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::core::{Agent, ConversationMemory};

/// Language choice offered by the form
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Language {
    English,
    Hindi,
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => write!(f, "English"),
            Language::Hindi => write!(f, "Hindi"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<Agent>,
    pub memory: Arc<Mutex<ConversationMemory>>,
}

impl AppState {
    pub fn new(agent: Agent) -> Self {
        Self {
            agent: Arc::new(agent),
            memory: Arc::new(Mutex::new(ConversationMemory::with_default_system())),
        }
    }
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy"
    }))
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    if req.query.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Enter a query.".to_string())),
        );
    }

    info!("Received query ({}): {}", req.language, req.query);

    // One conversation per process; the lock is held across the agent call so
    // requests are handled one at a time.
    let mut memory = state.memory.lock().await;
    let input = format!("{} in {}", req.query.trim(), req.language);

    match state.agent.run_turn(&mut memory, &input).await {
        Ok(result) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({
                "answer": result.output,
                "tool_calls": result.action_count(),
                "iterations": result.iterations,
            }))),
        ),
        Err(e) => {
            error!("Agent turn failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Agent error: {}", e))),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/chat", post(chat_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

pub async fn start_server(
    agent: Agent,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(AppState::new(agent));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("FinLegal AI listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>FinLegal AI: Finance &amp; Legal Aid for MSMEs/Consumers</title>
<style>
  body { font-family: sans-serif; max-width: 720px; margin: 2rem auto; padding: 0 1rem; }
  textarea { width: 100%; min-height: 6rem; margin: 0.5rem 0; }
  select, button { padding: 0.4rem 0.8rem; }
  #spinner { display: none; color: #555; }
  .success { background: #e6f4ea; border: 1px solid #b7dfc2; padding: 0.8rem; white-space: pre-wrap; }
  .warning { background: #fdf3e0; border: 1px solid #f0ce8e; padding: 0.8rem; }
  .hint { color: #666; font-size: 0.9rem; }
</style>
</head>
<body>
<h1>FinLegal AI: Finance &amp; Legal Aid for MSMEs/Consumers</h1>
<p class="hint">Query examples: 'Generate invoice for &#8377;10000 services' or
'Review this rental contract: [text]' or 'Advice on &#8377;50000 loan at 12% for 24 months'</p>

<label for="language">Language</label>
<select id="language">
  <option value="English">English</option>
  <option value="Hindi">Hindi</option>
</select>

<p><label for="query">Your Query:</label></p>
<textarea id="query"></textarea>
<br>
<button id="submit">Submit</button>
<span id="spinner">Analyzing...</span>

<div id="output"></div>

<script>
const submit = document.getElementById('submit');
const spinner = document.getElementById('spinner');
const output = document.getElementById('output');

submit.addEventListener('click', async () => {
  const query = document.getElementById('query').value;
  const language = document.getElementById('language').value;

  output.innerHTML = '';
  spinner.style.display = 'inline';
  submit.disabled = true;

  try {
    const res = await fetch('/api/chat', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ query, language }),
    });
    const body = await res.json();
    const div = document.createElement('div');
    if (body.success) {
      div.className = 'success';
      div.textContent = body.data.answer;
    } else {
      div.className = 'warning';
      div.textContent = body.error;
    }
    output.appendChild(div);
  } catch (err) {
    const div = document.createElement('div');
    div.className = 'warning';
    div.textContent = 'Request failed: ' + err;
    output.appendChild(div);
  } finally {
    spinner.style.display = 'none';
    submit.disabled = false;
  }
});
</script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::FunctionFactory;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let agent = Agent::new(
            "test-key".to_string(),
            FunctionFactory::with_default_tools(),
        );
        AppState::new(agent)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_index_serves_form() {
        let app = create_router(test_state());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("FinLegal AI"));
        assert!(html.contains("Hindi"));
        assert!(html.contains("Analyzing..."));
    }

    #[tokio::test]
    async fn test_empty_query_takes_warning_path() {
        let app = create_router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"query": "   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ApiResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("Enter a query."));
    }

    #[test]
    fn test_language_display() {
        assert_eq!(Language::English.to_string(), "English");
        assert_eq!(Language::Hindi.to_string(), "Hindi");
    }
}
