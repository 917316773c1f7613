//! Backend client tests against a fake gateway.

use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    routing::{get, post},
};
use maisys_client::{AgentStatus, AgentUpdate, BackendClient, ClientConfig, IntegrationStatus};
use serde_json::{Value, json};
use tokio::net::TcpListener;

fn agent(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Relances",
        "role": "Suivi des dossiers",
        "status": "active",
        "capabilities": ["email"],
        "lastActivity": "2025-01-01T10:00:00Z",
        "trigger": {"name": "Quotidien", "type": "schedule"}
    })
}

async fn spawn() -> BackendClient {
    let app = Router::new()
        .route("/api/backend/health", get(|| async { Json(json!({"ok": true})) }))
        .route(
            "/api/backend/data/agents",
            get(|| async { Json(json!([agent("a1"), agent("a2")])) })
                .post(|Json(body): Json<Value>| async move { (StatusCode::CREATED, Json(body)) }),
        )
        .route(
            "/api/backend/data/agents/{id}",
            get(|Path(id): Path<String>| async move {
                if id == "missing" {
                    (StatusCode::NOT_FOUND, Json(json!({"detail": "Agent missing not found"})))
                } else {
                    (StatusCode::OK, Json(agent(&id)))
                }
            })
            .put(|Path(id): Path<String>, Json(body): Json<Value>| async move {
                let mut updated = agent(&id);
                updated["status"] = body["status"].clone();
                Json(updated)
            })
            .delete(|| async { (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": "Backend service unavailable"}))) }),
        )
        .route(
            "/api/backend/data/integrations",
            get(|| async {
                Json(json!([{
                    "id": 1,
                    "name": "Annuaire",
                    "type": "directory",
                    "status": "inactive",
                    "description": "Annuaire interne"
                }]))
            }),
        )
        .route(
            "/api/backend/data/agents/sync/health",
            get(|| async {
                Json(json!({
                    "llm_gateway_connected": true,
                    "sync_service_status": "running",
                    "message": "ok"
                }))
            }),
        )
        .route(
            "/api/backend/data/workflows",
            get(|| async {
                Json(json!([{"id": "w1", "name": "Ouverture de compte", "status": "running"}]))
            }),
        )
        .route(
            "/api/backend/data/errors",
            get(|| async {
                Json(json!([{"type": "Timeout annuaire", "time": "il y a 5 min", "resolved": false}]))
            }),
        )
        .route(
            "/api/backend/data/activity",
            get(|| async {
                Json(json!([
                    {"user": "Awa Diop", "action": "a déployé Relances", "time": "10:02"},
                    {"user": "Marc Petit", "action": "a créé un agent", "time": "09:40"}
                ]))
            }),
        )
        .route(
            "/api/backend/data/agents/{id}/deploy",
            post(|Path(id): Path<String>| async move { Json(json!({"deployed": id})) }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    BackendClient::new(&ClientConfig::default().gateway_url(format!("http://{addr}/")))
}

#[tokio::test]
async fn reads_agents_and_integrations() {
    let backend = spawn().await;

    assert!(backend.health_check().await);
    let agents = backend.agents().await.unwrap();
    assert_eq!(agents.len(), 2);
    assert_eq!(agents[0].trigger.kind, "schedule");
    assert_eq!(agents[1].last_activity, "2025-01-01T10:00:00Z");

    let integrations = backend.integrations().await.unwrap();
    assert_eq!(integrations[0].kind, "directory");
    assert_eq!(integrations[0].status, IntegrationStatus::Inactive);

    let health = backend.sync_health().await.unwrap();
    assert!(health.llm_gateway_connected);
}

#[tokio::test]
async fn writes_agents() {
    let backend = spawn().await;

    let mut new_agent = backend.agent("a3").await.unwrap();
    new_agent.name = "Nouvel agent".to_owned();
    let created = backend.create_agent(&new_agent).await.unwrap();
    assert_eq!(created, new_agent);

    let update = AgentUpdate {
        status: Some(AgentStatus::Inactive),
        ..AgentUpdate::default()
    };
    let updated = backend.update_agent("a1", &update).await.unwrap();
    assert_eq!(updated.status, AgentStatus::Inactive);

    let deployed = backend.deploy_agent("a1").await.unwrap();
    assert_eq!(deployed["deployed"], "a1");
}

#[tokio::test]
async fn errors_prefer_detail() {
    let backend = spawn().await;

    let err = backend.agent("missing").await.unwrap_err();
    assert_eq!(err.to_string(), "Agent missing not found");

    let err = backend.delete_agent("a1").await.unwrap_err();
    assert_eq!(err.to_string(), "HTTP error! status: 503");
}

#[tokio::test]
async fn health_check_is_false_when_unreachable() {
    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = closed.local_addr().unwrap();
    drop(closed);

    let backend = BackendClient::new(&ClientConfig::default().gateway_url(format!("http://{addr}")));
    assert!(!backend.health_check().await);
    assert!(backend.deployment_overview().await.is_err());
}

#[tokio::test]
async fn reads_dashboard_feeds() {
    let backend = spawn().await;

    let workflows = backend.workflows().await.unwrap();
    assert_eq!(workflows[0].name, "Ouverture de compte");
    assert_eq!(workflows[0].description, None);

    let errors = backend.errors().await.unwrap();
    assert_eq!(errors[0].kind, "Timeout annuaire");
    assert!(!errors[0].resolved);

    let activity = backend.activity().await.unwrap();
    assert_eq!(activity.len(), 2);
    assert_eq!(activity[1].user, "Marc Petit");
}
