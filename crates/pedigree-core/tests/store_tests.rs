//! Exercises the Supabase client against an in-process HTTP server.

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use pedigree_core::horse::{HorseId, NewHorse, Sex};
use pedigree_core::store::{RecordStore, StoreError, SupabaseStore};

const KEY: &str = "anon-key";

#[derive(Clone, Default)]
struct Recorded {
    inserts: Arc<Mutex<Vec<Value>>>,
    uploads: Arc<Mutex<Vec<(String, String, usize)>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
    let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
    apikey == Some(KEY) && bearer == Some("Bearer anon-key")
}

async fn list_horses(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "bad key"})));
    }
    (
        StatusCode::OK,
        Json(json!([
            {"id": 1, "name": "Trovão", "breed": "Crioulo", "age": 9, "sex": "Macho"},
            {"id": 2, "name": "Brisa", "breed": "Crioulo", "age": "6", "sex": "Fêmea",
             "photoUrl": "https://cdn/brisa.png"},
            {"id": 3, "name": "Relâmpago", "breed": "Crioulo", "age": 2, "sex": "Male",
             "fatherId": 1, "motherId": "2"},
            {"id": 4, "breed": "nameless"}
        ])),
    )
}

async fn insert_horse(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let prefer = headers.get("prefer").and_then(|v| v.to_str().ok());
    if !authorized(&headers) || prefer != Some("return=representation") {
        return (StatusCode::BAD_REQUEST, Json(json!({"message": "bad request"})));
    }
    recorded.inserts.lock().unwrap().push(body.clone());

    let mut row = body;
    row["id"] = json!(42);
    (StatusCode::CREATED, Json(json!([row])))
}

async fn upload_photo(
    State(recorded): State<Recorded>,
    Path((bucket, path)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    recorded
        .uploads
        .lock()
        .unwrap()
        .push((format!("{}/{}", bucket, path), content_type, body.len()));
    StatusCode::OK
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "database offline")
}

async fn empty_insert() -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(json!([])))
}

async fn spawn(recorded: Recorded) -> String {
    let app = Router::new()
        .route("/rest/v1/horses", get(list_horses).post(insert_horse))
        .route("/rest/v1/broken", get(broken).post(broken))
        .route("/rest/v1/silent", post(empty_insert))
        .route("/storage/v1/object/{bucket}/{*path}", post(upload_photo))
        .with_state(recorded);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn new_horse() -> NewHorse {
    NewHorse {
        name: "Estrela".to_string(),
        breed: "Crioulo".to_string(),
        age: 3,
        sex: Sex::Female,
        photo_url: None,
        father_id: Some(HorseId::new("1")),
        mother_id: None,
    }
}

#[tokio::test]
async fn test_fetch_all_normalizes_rows() {
    let base = spawn(Recorded::default()).await;
    let store = SupabaseStore::new(base, KEY);

    let horses = store.fetch_all().await.unwrap();

    // The nameless row is skipped.
    assert_eq!(horses.len(), 3);
    assert_eq!(horses[0].id, HorseId::new("1"));
    assert_eq!(horses[0].sex, Some(Sex::Male));
    assert_eq!(horses[1].age, Some(6));
    assert_eq!(horses[1].sex, Some(Sex::Female));
    assert_eq!(horses[1].photo_url.as_deref(), Some("https://cdn/brisa.png"));
    assert_eq!(horses[2].father_id, Some(HorseId::new("1")));
    assert_eq!(horses[2].mother_id, Some(HorseId::new("2")));
}

#[tokio::test]
async fn test_wrong_key_is_api_error() {
    let base = spawn(Recorded::default()).await;
    let store = SupabaseStore::new(base, "wrong");

    let err = store.fetch_all().await.unwrap_err();
    assert!(matches!(err, StoreError::Api { status: 401, .. }));
}

#[tokio::test]
async fn test_server_error_carries_body() {
    let base = spawn(Recorded::default()).await;
    let store = SupabaseStore::new(base, KEY).with_table("broken");

    match store.fetch_all().await {
        Err(StoreError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "database offline");
        }
        other => panic!("expected api error, got {:?}", other.map(|h| h.len())),
    }
    assert!(store.insert(&new_horse()).await.is_err());
}

#[tokio::test]
async fn test_insert_returns_stored_row() {
    let recorded = Recorded::default();
    let base = spawn(recorded.clone()).await;
    let store = SupabaseStore::new(base, KEY);

    let created = store.insert(&new_horse()).await.unwrap();

    assert_eq!(created.id, HorseId::new("42"));
    assert_eq!(created.name, "Estrela");
    assert_eq!(created.sex, Some(Sex::Female));
    assert_eq!(created.father_id, Some(HorseId::new("1")));
    assert_eq!(created.mother_id, None);

    let inserts = recorded.inserts.lock().unwrap();
    let sent = inserts[0].as_object().unwrap();
    assert_eq!(sent["fatherId"], "1");
    assert!(!sent.contains_key("motherId"));
    assert!(!sent.contains_key("photoUrl"));
}

#[tokio::test]
async fn test_insert_without_representation() {
    let base = spawn(Recorded::default()).await;
    let store = SupabaseStore::new(base, KEY).with_table("silent");

    let err = store.insert(&new_horse()).await.unwrap_err();
    assert!(matches!(err, StoreError::EmptyResponse));
}

#[tokio::test]
async fn test_upload_then_public_url() {
    let recorded = Recorded::default();
    let base = spawn(recorded.clone()).await;
    let store = SupabaseStore::new(base.clone(), KEY).with_bucket("stable");

    store
        .upload("photos/abc.png", vec![1, 2, 3, 4], "image/png")
        .await
        .unwrap();

    let uploads = recorded.uploads.lock().unwrap().clone();
    assert_eq!(
        uploads,
        vec![("stable/photos/abc.png".to_string(), "image/png".to_string(), 4)]
    );

    let url = store.public_url("photos/abc.png").await.unwrap().unwrap();
    assert_eq!(
        url,
        format!("{}/storage/v1/object/public/stable/photos/abc.png", base)
    );
}

#[tokio::test]
async fn test_unreachable_store_is_network_error() {
    // Bind and drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = SupabaseStore::new(format!("http://{}", addr), KEY);
    let err = store.fetch_all().await.unwrap_err();
    assert!(matches!(err, StoreError::Network(_)));
}
