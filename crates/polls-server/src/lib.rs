pub mod error;
pub mod render;
pub mod routes;
pub mod state;

use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the axum Router with all poll pages and middleware.
pub fn build_router(app_state: state::AppState) -> Router {
    Router::new()
        .route("/polls", get(|| async { Redirect::permanent("/polls/") }))
        .route("/polls/", get(routes::polls::index))
        .route("/polls/{question_id}/", get(routes::polls::detail))
        .route(
            "/polls/{question_id}/results/",
            get(routes::polls::results),
        )
        .route("/polls/{question_id}", get(routes::polls::detail_redirect))
        .route(
            "/polls/{question_id}/results",
            get(routes::polls::results_redirect),
        )
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Serve on a pre-bound listener.
///
/// The caller can read the actual port before starting (useful when
/// `port = 0` and the OS picks a free port).
pub async fn serve_on(
    app_state: state::AppState,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    let app = build_router(app_state);

    tracing::info!("polls server listening on http://{addr}/polls/");

    if open_browser {
        let url = format!("http://localhost:{}/polls/", addr.port());
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
