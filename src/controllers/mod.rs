mod game;
mod scores;
mod utils;


use crate::{
    models::{Difficulty, GameStatus, Notice, ScoreRecord, TARGET_RANGE},
    prelude::*,
};

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_sessions::Session;

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    let router = game::add_routes(router);
    let router = scores::add_routes(router);

    return router
        .route("/", get(index))
        .route("/health", get(|| async { StatusCode::NO_CONTENT }));
}

struct DifficultyOption {
    value: &'static str,
    label: String,
    selected: bool,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    notices: Vec<Notice>,
    player_name: String,
    difficulties: Vec<DifficultyOption>,
    difficulty_label: String,

    attempts: u32,
    max_attempts: u32,
    attempts_left: u32,
    is_over: bool,
    won: bool,

    min_guess: i64,
    max_guess: i64,

    scores: Vec<ScoreRecord>,
}

async fn index(session: Session, State(state): State<AppState>) -> Result<impl IntoResponse> {
    let game = utils::current_game(&session)?;
    let player_name = utils::player_name(&session)?;

    let mut notices = utils::take_notices(&session)?;
    if let Some(notice) = state.scores.connection_error() {
        notices.insert(0, notice);
    }

    let scores = state
        .scores
        .top_scores(
            Some(game.difficulty()),
            state.cfg.leaderboard_limit,
            &mut notices,
        )
        .await;

    let difficulties = Difficulty::all()
        .into_iter()
        .map(|d| DifficultyOption {
            value: d.as_str(),
            label: d.label(),
            selected: d == game.difficulty(),
        })
        .collect();

    return Ok(IndexTemplate {
        notices,
        player_name,
        difficulties,
        difficulty_label: game.difficulty().label(),

        attempts: game.attempts(),
        max_attempts: game.max_attempts(),
        attempts_left: game.attempts_left(),
        is_over: game.is_over(),
        won: matches!(game.status(), GameStatus::Won { .. }),

        min_guess: *TARGET_RANGE.start(),
        max_guess: *TARGET_RANGE.end(),

        scores,
    });
}
