use super::utils;

use crate::{
    models::{Difficulty, GameSession, GuessOutcome, Notice},
    prelude::*,
};

use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    routing::post,
    Form, Router,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::info;

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    return router
        .route("/guess", post(post_guess))
        .route("/new-game", post(post_new_game));
}

#[derive(Debug, Deserialize)]
struct GuessForm {
    #[serde(default)]
    player_name: String,
    #[serde(default)]
    guess: String,
}

async fn post_guess(
    session: Session,
    State(state): State<AppState>,
    Form(form): Form<GuessForm>,
) -> Result<impl IntoResponse> {
    let mut game = utils::current_game(&session)?;
    utils::save_player_name(&session, &form.player_name)?;

    let mut notices = vec![];

    let Ok(value) = form.guess.trim().parse::<i64>() else {
        notices.push(Notice::warning(
            "Please enter a whole number between 1 and 100!",
        ));
        utils::push_notices(&session, notices)?;
        return Ok(Redirect::to("/"));
    };

    match game.submit_guess(&form.player_name, value) {
        Err(rejection) => notices.push(Notice::warning(rejection.to_string())),

        Ok(GuessOutcome::Miss(hint)) => notices.push(Notice::info(hint.message())),

        Ok(GuessOutcome::Won {
            attempts,
            elapsed_seconds,
        }) => {
            info!(
                player = %form.player_name.trim(),
                difficulty = %game.difficulty(),
                attempts,
                elapsed_seconds,
                "Game won"
            );

            notices.push(Notice::success(format!(
                "Congratulations! You guessed the number in {attempts} attempts!"
            )));

            if let Some(record) = game.score_record(&form.player_name) {
                state.scores.save_score(&record, &mut notices).await;
            }
        }

        Ok(GuessOutcome::Lost { hint, target }) => {
            info!(
                player = %form.player_name.trim(),
                difficulty = %game.difficulty(),
                target,
                "Game lost"
            );

            notices.push(Notice::info(hint.message()));
            notices.push(Notice::error(format!(
                "Game Over! The number was {target}"
            )));
        }
    }

    utils::save_game(&session, &game)?;
    utils::push_notices(&session, notices)?;

    return Ok(Redirect::to("/"));
}

#[derive(Debug, Deserialize)]
struct NewGameForm {
    difficulty: Option<String>,
    player_name: Option<String>,
}

async fn post_new_game(
    session: Session,
    Form(form): Form<NewGameForm>,
) -> Result<impl IntoResponse> {
    let previous = utils::find_game(&session)?;
    let mut notices = vec![];

    let difficulty = match form.difficulty.as_deref().map(str::parse::<Difficulty>) {
        Some(Ok(difficulty)) => difficulty,
        Some(Err(err)) => {
            notices.push(Notice::warning(err.to_string()));
            previous.map(|game| game.difficulty()).unwrap_or_default()
        }
        None => previous.map(|game| game.difficulty()).unwrap_or_default(),
    };

    if let Some(player_name) = &form.player_name {
        utils::save_player_name(&session, player_name)?;
    }

    let game = GameSession::new_game(difficulty);
    utils::save_game(&session, &game)?;
    utils::push_notices(&session, notices)?;

    info!(%difficulty, "New game started");

    return Ok(Redirect::to("/"));
}
