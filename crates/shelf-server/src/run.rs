use crate::config::ServerConfig;
use crate::error::Result;
use axum::{routing::get, Router};
use futures::FutureExt;
use shelf_app::{
    error::{method_not_allowed, panic_response, route_not_found},
    health::health,
    rest_api::router_for,
    state::AppState,
};
use shelf_types::CollectionKind;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub async fn run(args: ServerConfig) -> Result<()> {
    let state = build_state(&args);
    run_with_state(args, state).await
}

pub async fn run_with_state(args: ServerConfig, state: AppState) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    run_graceful_with_state(args, state, shutdown).await
}

pub async fn run_graceful_with_state<S>(
    args: ServerConfig,
    state: AppState,
    shutdown_signal: S,
) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let mut app = main_router(state, &args.collections());

    if !args.no_cors {
        app = app.layer(CorsLayer::very_permissive());
    }

    let addr = args.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "Listening on {}, serving {:?}",
        listener.local_addr()?,
        args.collections()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server stopped");
    Ok(())
}

pub fn main_router(state: AppState, collections: &[CollectionKind]) -> Router<()> {
    let mut router = Router::new();
    for kind in collections {
        router = router.nest(&format!("/{}", kind.as_str()), router_for(*kind));
    }
    router
        .route("/health", get(health).fallback(method_not_allowed))
        .fallback(route_not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

pub fn build_state(config: &ServerConfig) -> AppState {
    AppState::new(config.into())
}
