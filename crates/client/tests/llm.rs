//! LLM gateway client tests against a fake gateway.

use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    routing::{get, post},
};
use maisys_client::LlmClient;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;

async fn spawn(seen: Arc<Mutex<Option<Value>>>) -> LlmClient {
    let app = Router::new()
        .route(
            "/agents",
            get(|| async { Json(json!([{"name": "client-care-bot"}, {"name": "annuaire-bot"}])) }),
        )
        .route(
            "/agents/{name}",
            get(|Path(name): Path<String>| async move {
                if name == "ghost" {
                    (StatusCode::NOT_FOUND, Json(json!({"detail": "unknown agent"})))
                } else {
                    (StatusCode::OK, Json(json!({"name": name, "model": "mistral"})))
                }
            }),
        )
        .route(
            "/agents/{name}/test",
            post(move |Path(name): Path<String>, Json(body): Json<Value>| {
                let seen = Arc::clone(&seen);
                async move {
                    *seen.lock() = Some(body);
                    Json(json!({
                        "answer": "Bonjour !",
                        "agent": name,
                        "model_used": "mistral",
                        "complexity_analysis": {"level": "simple"}
                    }))
                }
            }),
        )
        .route(
            "/models/recommendations",
            get(|| async {
                Json(json!({
                    "quick_tasks": ["mistral"],
                    "complex_tasks": ["llama3:70b"],
                    "available_models": ["mistral", "llama3:70b"]
                }))
            }),
        )
        .route(
            "/models",
            get(|| async { Json(json!({"models": ["mistral", "llama3:70b"]})) }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    LlmClient::new(format!("http://{addr}/"))
}

#[tokio::test]
async fn lists_agents_and_models() {
    let llm = spawn(Arc::default()).await;

    let agents = llm.agents().await.unwrap();
    assert_eq!(agents.len(), 2);
    assert_eq!(agents[0]["name"], "client-care-bot");

    let agent = llm.agent("annuaire-bot").await.unwrap();
    assert_eq!(agent["model"], "mistral");

    assert_eq!(llm.models().await.unwrap(), vec!["mistral", "llama3:70b"]);
    let recommendations = llm.model_recommendations().await.unwrap();
    assert_eq!(recommendations.complex_tasks, vec!["llama3:70b"]);
}

#[tokio::test]
async fn test_agent_sends_instructions() {
    let seen = Arc::new(Mutex::new(None));
    let llm = spawn(Arc::clone(&seen)).await;

    let reply = llm
        .test_agent("client-care-bot", "Bonjour", None)
        .await
        .unwrap();
    assert_eq!(reply.answer, "Bonjour !");
    assert_eq!(reply.agent, "client-care-bot");
    assert_eq!(
        *seen.lock(),
        Some(json!({"agent": "client-care-bot", "question": "Bonjour", "custom_instructions": ""}))
    );

    llm.test_agent("client-care-bot", "Bonjour", Some("Vouvoyer"))
        .await
        .unwrap();
    assert_eq!(seen.lock().as_ref().unwrap()["custom_instructions"], "Vouvoyer");
}

#[tokio::test]
async fn error_status_is_reported() {
    let llm = spawn(Arc::default()).await;
    let err = llm.agent("ghost").await.unwrap_err();
    assert_eq!(err.to_string(), "LLM Gateway Error: 404 Not Found");
}
