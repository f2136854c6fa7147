use crate::api::api_error::APIError;
use crate::api::model::{APIResourceList, ChallengePayload, ChallengeResponse};
use crate::api::server::AppState;
use crate::challenge::ChallengeAction;
use crate::error::Error;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub(crate) fn new(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/apis/:group/v1alpha1", get(discovery))
        .route("/apis/:group/v1alpha1/:solver", post(solve))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.config.api_timeout))
        .with_state(state)
}

#[allow(clippy::unused_async)]
async fn health_check() -> impl IntoResponse {
    Json(json!({"ok":"healthy"}))
}

#[allow(clippy::unused_async)]
async fn discovery(
    State(state): State<AppState>,
    Path(group): Path<String>,
) -> Result<Json<APIResourceList>, APIError> {
    if group != state.config.group_name {
        return Err(Error::UnknownGroup(group).into());
    }
    Ok(Json(APIResourceList::for_solver(
        &state.config.group_name,
        state.solver.name(),
    )))
}

async fn solve(
    State(state): State<AppState>,
    Path((group, solver)): Path<(String, String)>,
    WithRejection(Json(payload), _): WithRejection<Json<ChallengePayload>, APIError>,
) -> Result<Json<ChallengePayload>, APIError> {
    if group != state.config.group_name {
        tracing::debug!("rejected challenge for unknown API group {group}");
        return Err(Error::UnknownGroup(group).into());
    }
    if solver != state.solver.name() {
        tracing::debug!("rejected challenge for unknown solver {group}/{solver}");
        return Err(Error::UnknownSolver { group, solver }.into());
    }
    let request = payload.request.ok_or(Error::MissingChallengeRequest)?;

    let result = match request.action {
        ChallengeAction::Present => state.solver.present(&request).await,
        ChallengeAction::CleanUp => state.solver.clean_up(&request).await,
    };
    let response = match result {
        Ok(()) => ChallengeResponse::success(request.uid),
        Err(err) => {
            tracing::warn!(
                "{:?} of {} failed: {err}",
                request.action,
                request.resolved_fqdn
            );
            ChallengeResponse::failure(request.uid, &err)
        }
    };
    Ok(Json(ChallengePayload::answer(response)))
}
