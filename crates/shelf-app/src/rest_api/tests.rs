use axum::{body::Body, Router};
use http::{header::CONTENT_TYPE, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use tracing_test::traced_test;

use super::router_for;
use crate::state::{AppConfig, AppState};
use shelf_types::CollectionKind;

fn app(sample_data: bool) -> Router {
    app_with_state(AppState::new(AppConfig { sample_data }))
}

fn app_with_state(state: AppState) -> Router {
    Router::new()
        .nest("/books", router_for(CollectionKind::Books))
        .nest("/quotes", router_for(CollectionKind::Quotes))
        .with_state(state)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
#[traced_test]
async fn test_list_sample_books() {
    let app = app(true);
    let (status, body) = call(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
    assert_eq!(body["items"][0]["id"], 1);
    assert_eq!(body["items"][0]["title"], "The Python Cookbook");
    assert!(body["message"].as_str().unwrap().contains("3 books"));
}

#[tokio::test]
#[traced_test]
async fn test_create_book() {
    let app = app(true);
    let (status, body) = call(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "Dune", "author": "Herbert", "year": 1965})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let item = &body["item"];
    assert_eq!(item["id"], 4);
    assert_eq!(item["isbn"], Value::Null);
    assert_eq!(item["created_at"], item["updated_at"]);
    assert!(body["message"].as_str().unwrap().contains("Dune"));

    let (status, body) = call(&app, Method::GET, "/books/4", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"]["title"], "Dune");
}

#[tokio::test]
#[traced_test]
async fn test_create_missing_fields() {
    let app = app(true);
    let (status, body) = call(&app, Method::POST, "/books", Some(json!({"title": "X"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("author"));
    assert!(error.contains("year"));
    assert_eq!(body["required_fields"], json!(["title", "author", "year"]));

    let (_, body) = call(&app, Method::GET, "/books", None).await;
    assert_eq!(body["count"], 3);
}

#[tokio::test]
#[traced_test]
async fn test_update_invalid_year() {
    let app = app(true);
    let (status, body) = call(&app, Method::PUT, "/books/1", Some(json!({"year": "not-a-number"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("year"));

    let (_, body) = call(&app, Method::GET, "/books/1", None).await;
    assert_eq!(body["item"]["year"], 2013);
}

#[tokio::test]
#[traced_test]
async fn test_partial_update() {
    let app = app(true);
    let (status, body) = call(
        &app,
        Method::PUT,
        "/books/2",
        Some(json!({"author": "Miguel Grinberg and Friends", "isbn": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let item = &body["item"];
    assert_eq!(item["author"], "Miguel Grinberg and Friends");
    assert_eq!(item["title"], "Flask Web Development");
    assert_eq!(item["year"], 2018);
    assert_eq!(item["isbn"], Value::Null);
}

#[tokio::test]
#[traced_test]
async fn test_empty_update() {
    let app = app(true);
    let (status, body) = call(&app, Method::PUT, "/books/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No update data provided");
}

#[tokio::test]
#[traced_test]
async fn test_update_missing_record() {
    let app = app(true);
    let (status, _) = call(&app, Method::PUT, "/books/999", Some(json!({"title": "Ghost"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // body is validated first
    let (status, _) = call(&app, Method::PUT, "/books/999", Some(json!({"year": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[traced_test]
async fn test_delete_then_get() {
    let app = app(true);
    let (status, body) = call(&app, Method::DELETE, "/books/3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted_id"], 3);

    let (status, body) = call(&app, Method::GET, "/books/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book with ID 3 not found");

    let (status, _) = call(&app, Method::DELETE, "/books/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[traced_test]
async fn test_get_missing() {
    let app = app(true);
    let (status, body) = call(&app, Method::GET, "/books/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("999"));
    assert!(body["message"].is_string());
}

#[tokio::test]
#[traced_test]
async fn test_non_numeric_id() {
    let app = app(true);
    for uri in ["/books/abc", "/books/-1", "/quotes/1.5"] {
        let (status, body) = call(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
#[traced_test]
async fn test_ids_not_reused() {
    let app = app(false);
    let mut ids = Vec::new();
    for text in ["One", "Two", "Three"] {
        let (status, body) = call(
            &app,
            Method::POST,
            "/quotes",
            Some(json!({"text": text, "character": "Fry", "episode": "Space Pilot 3000"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["item"]["id"].as_u64().unwrap());
    }
    assert_eq!(ids, vec![1, 2, 3]);

    let (status, _) = call(&app, Method::DELETE, "/quotes/2", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, Method::GET, "/quotes", None).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["items"][0]["text"], "One");
    assert_eq!(body["items"][1]["text"], "Three");

    let (_, body) = call(
        &app,
        Method::POST,
        "/quotes",
        Some(json!({"text": "Four", "character": "Fry", "episode": "E"})),
    )
    .await;
    assert_eq!(body["item"]["id"], 4);
}

#[tokio::test]
#[traced_test]
async fn test_body_policy() {
    let app = app(true);

    let (status, body) = call(&app, Method::POST, "/books", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let request = Request::post("/books")
        .header(CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"title":"Dune","author":"Herbert","year":1965}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let request = Request::put("/books/1")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{broken"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, Method::POST, "/books", Some(json!(["not", "an", "object"]))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[traced_test]
async fn test_wrong_method() {
    let app = app(true);
    let (status, body) = call(&app, Method::DELETE, "/books", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(body["error"].is_string());

    let (status, _) = call(&app, Method::POST, "/quotes/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
#[traced_test]
async fn test_quote_lifecycle() {
    let app = app(true);
    let (status, body) = call(
        &app,
        Method::POST,
        "/quotes",
        Some(json!({
            "text": "I'm back, baby!",
            "character": "Bender",
            "episode": "Space Pilot 3000",
            "season": "1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["item"]["id"], 5);
    assert_eq!(body["item"]["season"], 1);
    assert_eq!(body["item"]["year"], Value::Null);

    let (status, body) = call(&app, Method::PUT, "/quotes/5", Some(json!({"season": null, "year": 1999}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"]["season"], Value::Null);
    assert_eq!(body["item"]["year"], 1999);
    assert_eq!(body["item"]["text"], "I'm back, baby!");

    let (status, body) = call(&app, Method::PUT, "/quotes/5", Some(json!({"text": null}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("text"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_distinct_ids() {
    const TASKS: u64 = 32;
    let app = app(true);
    let tasks: Vec<_> = (0..TASKS)
        .map(|n| {
            let app = app.clone();
            tokio::spawn(async move {
                let quote = json!({"text": format!("Quote {n}"), "character": "Fry", "episode": "E"});
                let (status, body) = call(&app, Method::POST, "/quotes", Some(quote)).await;
                assert_eq!(status, StatusCode::CREATED);
                body["item"]["id"].as_u64().unwrap()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap());
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len() as u64, TASKS);
    assert_eq!(ids[0], 5);
    assert_eq!(*ids.last().unwrap(), ids[0] + TASKS - 1);

    let (_, body) = call(&app, Method::GET, "/quotes", None).await;
    assert_eq!(body["count"], 4 + TASKS);
}

#[tokio::test]
#[traced_test]
async fn test_poisoned_repository_is_500() {
    let state = AppState::new(AppConfig { sample_data: true });
    let shared = state.clone();
    let _ = std::thread::spawn(move || {
        let _guard = shared.quotes().write().unwrap();
        panic!("writer died");
    })
    .join();

    let app = app_with_state(state);
    let (status, body) = call(&app, Method::GET, "/quotes", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());

    let (status, _) = call(&app, Method::GET, "/books/1", None).await;
    assert_eq!(status, StatusCode::OK);
}
