//! Directory client tests against an in-process fake service.

use axum::{
    Json, Router,
    extract::{Path, RawQuery, State},
    http::StatusCode,
    routing::get,
};
use maisys_directory::{
    DirectoryClient, DirectoryConfig, DirectoryEntry, DirectoryError, EntryUpdate, NewEntry,
    SearchFilters,
};
use mcore::RecordingSleeper;
use serde_json::{Value, json};
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Fake {
    /// Number of leading requests answered with 500.
    failures: usize,
    /// Serve records whose unset fields are `null`.
    nulls: bool,
    calls: Arc<AtomicUsize>,
    last_query: Arc<parking_lot::Mutex<Option<String>>>,
    last_body: Arc<parking_lot::Mutex<Option<Value>>>,
}

fn entries() -> Value {
    json!([
        {"id": 1, "nom": "Awa Diop", "ip": "10.0.0.1", "poste": "Conseillère", "departement": "Particuliers", "email": "awa@rb.fr", "tel": "0562000001"},
        {"id": 2, "nom": "Marc Petit", "ip": "", "poste": "Analyste", "departement": "Crédit", "email": "marc@rb.fr", "tel": "0562000002"},
        {"id": 3, "nom": "Lina Roy", "ip": "10.0.0.3", "poste": "Conseillère", "departement": "Particuliers", "email": "lina@rb.fr", "tel": ""}
    ])
}

fn entries_with_nulls() -> Value {
    json!([
        {"id": 1, "nom": "Awa Diop", "ip": "10.0.0.1", "poste": "Conseillère", "departement": "Particuliers", "email": "awa@rb.fr", "tel": "0562000001"},
        {"id": 2, "nom": "Marc Petit", "ip": null, "poste": "Analyste", "departement": null, "email": null, "tel": "0562000002"}
    ])
}

async fn list(State(fake): State<Fake>, RawQuery(query): RawQuery) -> (StatusCode, Json<Value>) {
    let n = fake.calls.fetch_add(1, Ordering::SeqCst);
    *fake.last_query.lock() = query;
    if n < fake.failures {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({})));
    }
    if fake.nulls {
        return (StatusCode::OK, Json(entries_with_nulls()));
    }
    (StatusCode::OK, Json(entries()))
}

async fn create(State(fake): State<Fake>, Json(body): Json<Value>) -> Json<Value> {
    fake.calls.fetch_add(1, Ordering::SeqCst);
    *fake.last_body.lock() = Some(body.clone());
    let mut created = body;
    created["id"] = json!(42);
    Json(created)
}

async fn one(State(fake): State<Fake>, Path(id): Path<u64>) -> (StatusCode, Json<Value>) {
    fake.calls.fetch_add(1, Ordering::SeqCst);
    match entries()
        .as_array()
        .and_then(|all| all.iter().find(|e| e["id"] == id).cloned())
    {
        Some(entry) => (StatusCode::OK, Json(entry)),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))),
    }
}

async fn update(
    State(fake): State<Fake>,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    fake.calls.fetch_add(1, Ordering::SeqCst);
    *fake.last_body.lock() = Some(body.clone());
    let mut entry = entries()[0].clone();
    entry["id"] = json!(id);
    if let Some(poste) = body.get("poste") {
        entry["poste"] = poste.clone();
    }
    Json(entry)
}

async fn remove(State(fake): State<Fake>, Path(id): Path<u64>) -> Json<Value> {
    fake.calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({"message": format!("Entrée {id} supprimée")}))
}

async fn spawn(fake: Fake) -> String {
    let app = Router::new()
        .route("/api/annuaire", get(list).post(create))
        .route("/api/annuaire/{id}", get(one).put(update).delete(remove))
        .with_state(fake);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn client(fake: &Fake) -> (DirectoryClient<Arc<RecordingSleeper>>, Arc<RecordingSleeper>) {
    let config = DirectoryConfig {
        base_url: spawn(fake.clone()).await,
        ..DirectoryConfig::default()
    };
    let sleeper = Arc::new(RecordingSleeper::new());
    let client = DirectoryClient::with_sleeper(&config, Arc::clone(&sleeper)).unwrap();
    (client, sleeper)
}

#[tokio::test]
async fn search_passes_filters_as_query() {
    let fake = Fake::default();
    let (client, _) = client(&fake).await;
    let filters = SearchFilters {
        search: Some("awa".into()),
        departement: Some("Particuliers".into()),
        poste: None,
    };
    let found = client.search_entries(&filters).await.unwrap();
    assert_eq!(found.len(), 3);
    assert_eq!(
        fake.last_query.lock().as_deref(),
        Some("query=awa&departement=Particuliers")
    );
}

#[tokio::test]
async fn search_without_filters_sends_no_query() {
    let fake = Fake::default();
    let (client, _) = client(&fake).await;
    client
        .search_entries(&SearchFilters::default())
        .await
        .unwrap();
    assert_eq!(*fake.last_query.lock(), None);
}

#[tokio::test]
async fn transient_failures_then_success() {
    let fake = Fake {
        failures: 2,
        ..Fake::default()
    };
    let (client, sleeper) = client(&fake).await;
    let found = client
        .search_entries(&SearchFilters::default())
        .await
        .unwrap();

    assert_eq!(found.len(), 3);
    assert_eq!(fake.calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        sleeper.delays(),
        vec![Duration::from_secs(2), Duration::from_secs(4)]
    );
}

#[tokio::test]
async fn gives_up_after_three_failures() {
    let fake = Fake {
        failures: usize::MAX,
        ..Fake::default()
    };
    let (client, sleeper) = client(&fake).await;
    let err = client
        .search_entries(&SearchFilters::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DirectoryError::Exhausted(_)));
    let message = err.to_string();
    assert!(message.contains("Failed after 3 attempts"), "{message}");
    assert!(message.contains("HTTP 500"), "{message}");
    assert_eq!(fake.calls.load(Ordering::SeqCst), 3);
    assert_eq!(sleeper.total(), Duration::from_secs(6));
}

#[tokio::test]
async fn unreachable_service_is_retried() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = DirectoryConfig {
        base_url: format!("http://{addr}"),
        ..DirectoryConfig::default()
    };
    let sleeper = Arc::new(RecordingSleeper::new());
    let client = DirectoryClient::with_sleeper(&config, Arc::clone(&sleeper)).unwrap();
    let err = client.all_entries().await.unwrap_err();
    assert!(err.to_string().starts_with("Failed after 3 attempts"));
    assert_eq!(sleeper.delays().len(), 2);

    let status = client.test_connection().await;
    assert_eq!(status.status, "error");
}

#[tokio::test]
async fn crud_round() {
    let fake = Fake::default();
    let (client, _) = client(&fake).await;

    let created = client
        .create_entry(&NewEntry {
            nom: "Nina Faure".into(),
            poste: "Caissière".into(),
            departement: "Agence".into(),
            email: "nina@rb.fr".into(),
            tel: "0562000009".into(),
            ..NewEntry::default()
        })
        .await
        .unwrap();
    assert_eq!(created.id, 42);
    assert_eq!(
        *fake.last_body.lock(),
        Some(json!({
            "nom": "Nina Faure",
            "ip": "",
            "poste": "Caissière",
            "departement": "Agence",
            "email": "nina@rb.fr",
            "tel": "0562000009"
        }))
    );
    assert_eq!(created.nom, "Nina Faure");

    let entry = client.entry_by_id(2).await.unwrap();
    assert_eq!(entry.nom, "Marc Petit");

    let updated = client
        .update_entry(
            1,
            &EntryUpdate {
                poste: Some("Directrice".into()),
                ..EntryUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.poste, "Directrice");
    assert_eq!(*fake.last_body.lock(), Some(json!({"poste": "Directrice"})));

    let ack = client.delete_entry(3).await.unwrap();
    assert_eq!(ack.message, "Entrée 3 supprimée");
}

#[tokio::test]
async fn aggregates_use_full_fetch() {
    let fake = Fake::default();
    let (client, _) = client(&fake).await;

    assert_eq!(
        client.departments().await.unwrap(),
        vec!["Particuliers".to_owned(), "Crédit".to_owned()]
    );
    let stats = client.statistics().await.unwrap();
    assert_eq!(stats.total_entries, 3);
    assert_eq!(stats.by_department["Particuliers"], 2);
    assert_eq!(stats.by_poste["Conseillère"], 2);

    let incomplete: Vec<u64> = client
        .incomplete_entries()
        .await
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(incomplete, vec![2, 3]);

    let by_ip: Option<DirectoryEntry> = client.entry_by_ip("10.0.0.3").await.unwrap();
    assert_eq!(by_ip.unwrap().nom, "Lina Roy");

    let status = client.test_connection().await;
    assert_eq!(status.status, "success");
    assert!(status.message.contains("3 entrées"));
}

#[tokio::test]
async fn execute_action_fills_path_and_query() {
    let fake = Fake::default();
    let (client, _) = client(&fake).await;

    let params = json!({"id": 1}).as_object().cloned().unwrap();
    let entry = client
        .execute_action("get_entry_by_id", &params)
        .await
        .unwrap();
    assert_eq!(entry["nom"], "Awa Diop");

    let params = json!({"query": "petit", "ignored": true})
        .as_object()
        .cloned()
        .unwrap();
    client
        .execute_action("search_entries", &params)
        .await
        .unwrap();
    assert_eq!(fake.last_query.lock().as_deref(), Some("query=petit"));
}

#[tokio::test]
async fn execute_action_rejects_bad_input() {
    let fake = Fake::default();
    let (client, _) = client(&fake).await;

    let err = client
        .execute_action("drop_everything", &Default::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Action drop_everything not found");

    let err = client
        .execute_action("delete_entry", &Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::MissingParameter { .. }));
    assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn null_fields_read_as_missing() {
    let fake = Fake {
        nulls: true,
        ..Fake::default()
    };
    let (client, sleeper) = client(&fake).await;

    let incomplete = client.incomplete_entries().await.unwrap();
    assert_eq!(incomplete.len(), 1);
    assert_eq!(incomplete[0].id, 2);
    assert_eq!(incomplete[0].ip, "");
    assert_eq!(incomplete[0].email, "");
    assert!(sleeper.delays().is_empty());

    assert_eq!(
        client.departments().await.unwrap(),
        vec!["Particuliers".to_owned()]
    );
    assert_eq!(client.statistics().await.unwrap().total_entries, 2);
    assert_eq!(fake.calls.load(Ordering::SeqCst), 3);
}
