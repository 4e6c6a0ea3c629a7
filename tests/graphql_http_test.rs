use anyhow::Result;
use axum::http::{header, Request, StatusCode};
use hyper::Body;
use serde_json::{json, Value};
use std::sync::Arc;
use todo_graphql::domain::Todo;
use todo_graphql::server::create_server;
use todo_graphql::storage::InMemoryStorage;
use tower::ServiceExt;

fn seeded_app() -> axum::Router {
    let storage = InMemoryStorage::with_todos(vec![
        Todo {
            id: "t-1".to_string(),
            user_id: 1,
            title: "feed cat".to_string(),
            completed: false,
        },
        Todo {
            id: "t-2".to_string(),
            user_id: 2,
            title: "book flights".to_string(),
            completed: true,
        },
    ]);
    create_server(Arc::new(storage), None)
}

async fn post_graphql(app: axum::Router, body: Value) -> Result<(StatusCode, Value)> {
    let request = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body)?))?;

    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn post_query_returns_graphql_result() -> Result<()> {
    let (status, body) = post_graphql(
        seeded_app(),
        json!({"query": "{ searchTodos(userId: 2) { id title completed } }"}),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["searchTodos"],
        json!([{"id": "t-2", "title": "book flights", "completed": true}])
    );
    Ok(())
}

#[tokio::test]
async fn variables_are_honoured() -> Result<()> {
    let (_, body) = post_graphql(
        seeded_app(),
        json!({
            "query": "query Get($id: String) { getTodo(id: $id) { title userId } }",
            "variables": {"id": "t-1"}
        }),
    )
    .await?;

    assert_eq!(body["data"]["getTodo"], json!({"title": "feed cat", "userId": 1}));
    Ok(())
}

#[tokio::test]
async fn mutations_round_trip_over_http() -> Result<()> {
    let app = seeded_app();

    let (_, body) = post_graphql(
        app.clone(),
        json!({"query": r#"mutation { updateTodo(id: "t-1", completed: true) { modifiedCount result } }"#}),
    )
    .await?;
    assert_eq!(body["data"]["updateTodo"], json!({"modifiedCount": 1, "result": 1}));

    let (_, body) = post_graphql(
        app.clone(),
        json!({"query": r#"mutation { deleteTodo(id: "t-2") { deletedCount } }"#}),
    )
    .await?;
    assert_eq!(body["data"]["deleteTodo"]["deletedCount"], 1);

    let (_, body) = post_graphql(
        app,
        json!({"query": "{ searchTodos { id completed } }"}),
    )
    .await?;
    assert_eq!(body["data"]["searchTodos"], json!([{"id": "t-1", "completed": true}]));
    Ok(())
}

#[tokio::test]
async fn resolver_errors_keep_http_ok() -> Result<()> {
    let (status, body) = post_graphql(
        seeded_app(),
        json!({"query": "mutation { deleteTodo { deletedCount } }"}),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["errors"].as_array().map(Vec::is_empty).unwrap_or(true));
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_rejected() -> Result<()> {
    let request = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;

    let response = seeded_app().oneshot(request).await?;
    assert!(response.status().is_client_error());
    Ok(())
}

#[tokio::test]
async fn health_reports_service() -> Result<()> {
    let request = Request::builder().uri("/health").body(Body::empty())?;
    let response = seeded_app().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = hyper::body::to_bytes(response.into_body()).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "todo-graphql");
    Ok(())
}

#[tokio::test]
async fn metrics_route_is_not_found_when_disabled() -> Result<()> {
    let request = Request::builder().uri("/metrics").body(Body::empty())?;
    let response = seeded_app().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn graphiql_serves_html() -> Result<()> {
    let request = Request::builder().uri("/graphiql").body(Body::empty())?;
    let response = seeded_app().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = hyper::body::to_bytes(response.into_body()).await?;
    let html = String::from_utf8(bytes.to_vec())?;
    assert!(html.contains("/graphql"));
    Ok(())
}

#[tokio::test]
async fn metrics_route_counts_graphql_operations() -> Result<()> {
    let handle = todo_graphql::metrics::init_metrics();
    assert!(handle.is_some());

    let storage = InMemoryStorage::new();
    let app = create_server(Arc::new(storage), handle);

    let (_, body) = post_graphql(
        app.clone(),
        json!({"query": "{ searchTodos { id } }"}),
    )
    .await?;
    assert!(body["data"]["searchTodos"].is_array());

    let request = Request::builder().uri("/metrics").body(Body::empty())?;
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = hyper::body::to_bytes(response.into_body()).await?;
    let text = String::from_utf8(bytes.to_vec())?;
    assert!(text.contains("todo_graphql_operations_total"), "{text}");
    assert!(text.contains("operation=\"searchTodos\""), "{text}");
    Ok(())
}
