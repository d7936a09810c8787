//! Client tests against an in-process fake of the JBoard employer API.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use jboard_client::{Employer, EmployerUpdate, JBoardClient, JBoardError};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Default)]
struct FakeDirectory {
    pages: Vec<Value>,
    patches: Vec<(String, Value)>,
    auth_headers: Vec<String>,
    fail_with: Option<StatusCode>,
}

type Shared = Arc<Mutex<FakeDirectory>>;

#[derive(Deserialize)]
struct ListQuery {
    page: usize,
    per_page: usize,
}

async fn list_employers(
    State(state): State<Shared>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    let mut dir = state.lock().unwrap();
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        dir.auth_headers.push(auth.to_string());
    }
    if let Some(status) = dir.fail_with {
        return Err(status);
    }
    assert!(query.per_page > 0);
    dir.pages
        .get(query.page - 1)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn patch_employer(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.lock().unwrap().patches.push((id, body.clone()));
    Json(body)
}

async fn spawn(dir: FakeDirectory) -> (JBoardClient, Shared) {
    let state = Arc::new(Mutex::new(dir));
    let app = Router::new()
        .route("/employers", get(list_employers))
        .route("/employers/:id", axum::routing::patch(patch_employer))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = JBoardClient::new(format!("http://{}/", addr), "secret-key").unwrap();
    (client, state)
}

fn employer_json(id: i64) -> Value {
    json!({
        "id": id,
        "name": format!("Employer {}", id),
        "website": "",
        "description": null,
        "created_at": "2024-05-01 10:00:00",
        "logo": "logo.png"
    })
}

#[tokio::test]
async fn test_fetch_page_sends_bearer_and_reads_items() {
    let (client, state) = spawn(FakeDirectory {
        pages: vec![json!({
            "items": [employer_json(1), employer_json(2)],
            "current_page": 1,
            "last_page": 2
        })],
        ..Default::default()
    })
    .await;

    let page = client.fetch_page(1, 15).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.current_page, 1);
    assert_eq!(page.last_page, 2);
    assert!(page.has_more());

    let dir = state.lock().unwrap();
    assert_eq!(dir.auth_headers, vec!["Bearer secret-key".to_string()]);
}

#[tokio::test]
async fn test_fetch_page_without_items_is_malformed() {
    let (client, _state) = spawn(FakeDirectory {
        pages: vec![json!({"data": [], "last_page": 1})],
        ..Default::default()
    })
    .await;

    let err = client.fetch_page(1, 15).await.unwrap_err();
    assert!(matches!(err, JBoardError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_server_error_is_api_error() {
    let (client, _state) = spawn(FakeDirectory {
        fail_with: Some(StatusCode::SERVICE_UNAVAILABLE),
        ..Default::default()
    })
    .await;

    let err = client.fetch_page(1, 15).await.unwrap_err();
    assert!(matches!(err, JBoardError::Api { status: 503, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_patch_sends_full_record_with_overrides() {
    let (client, state) = spawn(FakeDirectory::default()).await;

    let original: Employer = serde_json::from_value(employer_json(7)).unwrap();
    let update = EmployerUpdate {
        website: Some("https://employer7.com".into()),
        description: Some(String::new()),
    };

    let updated = client.patch_employer(&original, &update).await.unwrap();
    assert_eq!(updated.website(), Some("https://employer7.com"));

    let dir = state.lock().unwrap();
    assert_eq!(dir.patches.len(), 1);
    let (id, body) = &dir.patches[0];
    assert_eq!(id, "7");

    let mut expected = employer_json(7);
    expected["website"] = json!("https://employer7.com");
    assert_eq!(body, &expected);
}

#[tokio::test]
async fn test_empty_patch_echoes_original_record() {
    let (client, state) = spawn(FakeDirectory::default()).await;

    let original: Employer = serde_json::from_value(employer_json(3)).unwrap();
    client
        .patch_employer(&original, &EmployerUpdate::default())
        .await
        .unwrap();

    let dir = state.lock().unwrap();
    assert_eq!(dir.patches[0].1, employer_json(3));
}

#[tokio::test]
async fn test_empty_patch_of_sparse_record_sends_it_back_unchanged() {
    let (client, state) = spawn(FakeDirectory::default()).await;

    let raw = json!({"id": 5, "name": "Sparse"});
    let original: Employer = serde_json::from_value(raw.clone()).unwrap();
    client
        .patch_employer(&original, &EmployerUpdate::default())
        .await
        .unwrap();

    let dir = state.lock().unwrap();
    assert_eq!(dir.patches[0], ("5".to_string(), raw));
}

#[tokio::test]
async fn test_null_name_does_not_reject_the_page() {
    let (client, _state) = spawn(FakeDirectory {
        pages: vec![json!({
            "items": [{"id": 1, "name": "Ok"}, {"id": 2, "name": null}],
            "current_page": 1,
            "last_page": 1
        })],
        ..Default::default()
    })
    .await;

    let page = client.fetch_page(1, 15).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].name(), "Ok");
    assert_eq!(page.items[1].name(), "");
}

#[tokio::test]
async fn test_fetch_all_follows_pages() {
    let (client, _state) = spawn(FakeDirectory {
        pages: vec![
            json!({"items": [employer_json(1), employer_json(2)], "current_page": 1, "last_page": 3}),
            json!({"items": [employer_json(3), employer_json(4)], "current_page": 2, "last_page": 3}),
            json!({"items": [employer_json(5)], "current_page": 3, "last_page": 3}),
        ],
        ..Default::default()
    })
    .await;

    let all = client.fetch_all(2).await.unwrap();
    let ids: Vec<String> = all.iter().map(|e| e.id.to_string()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
}
