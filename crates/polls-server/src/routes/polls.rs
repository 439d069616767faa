use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{Redirect, Response};
use polls_core::page;

use crate::error::AppError;
use crate::render::render;
use crate::state::AppState;

/// Only plain ASCII digits form an id; signs and whitespace match no page.
fn parse_question_id(raw: &str) -> Result<u64, AppError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::not_found("page not found"));
    }
    raw.parse::<u64>()
        .map_err(|_| AppError::not_found("page not found"))
}

/// GET /polls/{id}: add the trailing slash.
pub async fn detail_redirect(Path(question_id): Path<String>) -> Result<Redirect, AppError> {
    let question_id = parse_question_id(&question_id)?;
    Ok(Redirect::permanent(&format!("/polls/{question_id}/")))
}

/// GET /polls/{id}/results: add the trailing slash.
pub async fn results_redirect(Path(question_id): Path<String>) -> Result<Redirect, AppError> {
    let question_id = parse_question_id(&question_id)?;
    Ok(Redirect::permanent(&format!("/polls/{question_id}/results/")))
}

/// GET /polls/: visible questions, newest first.
pub async fn index(
    State(app): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let store = app.store.clone();
    let now = app.clock.now();
    let ctx = tokio::task::spawn_blocking(move || page::index_context(store.as_ref(), now))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(render(&ctx, &app.site_title, &headers))
}

/// GET /polls/{id}/: one published question and its choices.
pub async fn detail(
    State(app): State<AppState>,
    Path(question_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let question_id = parse_question_id(&question_id)?;
    let store = app.store.clone();
    let now = app.clock.now();
    let ctx = tokio::task::spawn_blocking(move || {
        page::detail_context(store.as_ref(), question_id, now)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(render(&ctx, &app.site_title, &headers))
}

/// GET /polls/{id}/results/: vote counts for every choice.
pub async fn results(
    State(app): State<AppState>,
    Path(question_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let question_id = parse_question_id(&question_id)?;
    let store = app.store.clone();
    let now = app.clock.now();
    let ctx = tokio::task::spawn_blocking(move || {
        page::results_context(store.as_ref(), question_id, now)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(render(&ctx, &app.site_title, &headers))
}
