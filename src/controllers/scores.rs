use crate::{
    models::{Difficulty, Notice, ScoreRecord},
    prelude::*,
    scores::DEFAULT_LIMIT,
};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

const MAX_LIMIT: usize = 100;

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    return router.route("/scores", get(scores));
}

#[derive(Debug, Deserialize)]
struct ScoresParams {
    difficulty: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ScoresResponse {
    scores: Vec<ScoreRecord>,
    errors: Vec<String>,
}

async fn scores(Query(params): Query<ScoresParams>, State(state): State<AppState>) -> Response {
    let difficulty = match params.difficulty.as_deref().filter(|d| !d.is_empty()) {
        Some(raw) => match raw.parse::<Difficulty>() {
            Ok(difficulty) => Some(difficulty),
            Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
        },
        None => None,
    };

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let mut notices: Vec<Notice> = state.scores.connection_error().into_iter().collect();
    let scores = state
        .scores
        .top_scores(difficulty, limit, &mut notices)
        .await;

    return Json(ScoresResponse {
        scores,
        errors: notices.into_iter().map(|notice| notice.text).collect(),
    })
    .into_response();
}
