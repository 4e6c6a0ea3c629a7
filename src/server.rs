use crate::graphql::{create_schema, GraphQLSchema};
use crate::storage::Storage;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Json},
    routing::get,
    Extension, Router,
};
use hyper::Server;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "todo-graphql",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GraphQL handler (supports GET and POST)
async fn graphql_handler(
    Extension(schema): Extension<GraphQLSchema>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

/// GraphiQL IDE endpoint
async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Prometheus text exposition
async fn metrics(State(handle): State<Option<PrometheusHandle>>) -> impl IntoResponse {
    match handle {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}

/// Create the HTTP router with the GraphQL, GraphiQL, health and metrics routes
pub fn create_server(storage: Arc<dyn Storage>, metrics_handle: Option<PrometheusHandle>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let schema = create_schema(storage);

    Router::new()
        .route("/health", get(health))
        .route("/graphql", get(graphql_handler).post(graphql_handler))
        .route("/graphiql", get(graphiql))
        .route("/metrics", get(metrics))
        .with_state(metrics_handle)
        .layer(Extension(schema))
        .layer(ServiceBuilder::new().layer(cors))
}

/// Start the HTTP server on the given address
pub async fn start_server(
    storage: Arc<dyn Storage>,
    metrics_handle: Option<PrometheusHandle>,
    addr: SocketAddr,
) -> anyhow::Result<()> {
    let app = create_server(storage, metrics_handle);

    info!("HTTP server listening on http://{}", addr);
    info!("GraphQL:      http://{}/graphql", addr);
    info!("GraphiQL UI:  http://{}/graphiql", addr);
    info!("Health check: http://{}/health", addr);

    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
