use crate::{
    models::{Difficulty, GameSession, Notice},
    prelude::*,
};

use tower_sessions::Session;

const GAME_KEY: &str = "game";
const PLAYER_NAME_KEY: &str = "player_name";
const NOTICES_KEY: &str = "notices";

pub fn find_game(session: &Session) -> Result<Option<GameSession>> {
    return Ok(session.get(GAME_KEY)?);
}

/// Current game, starting one if the visitor has none yet.
pub fn current_game(session: &Session) -> Result<GameSession> {
    if let Some(game) = find_game(session)? {
        return Ok(game);
    }

    let game = GameSession::new_game(Difficulty::default());
    save_game(session, &game)?;

    tracing::debug!(session_id = %session.id().0, "Started first game");

    return Ok(game);
}

pub fn save_game(session: &Session, game: &GameSession) -> Result {
    session.insert(GAME_KEY, game)?;
    return Ok(());
}

pub fn player_name(session: &Session) -> Result<String> {
    return Ok(session.get(PLAYER_NAME_KEY)?.unwrap_or_default());
}

pub fn save_player_name(session: &Session, player_name: &str) -> Result {
    session.insert(PLAYER_NAME_KEY, player_name.trim())?;
    return Ok(());
}

pub fn push_notices(session: &Session, notices: Vec<Notice>) -> Result {
    if notices.is_empty() {
        return Ok(());
    }

    let mut queued: Vec<Notice> = session.get(NOTICES_KEY)?.unwrap_or_default();
    queued.extend(notices);
    session.insert(NOTICES_KEY, queued)?;

    return Ok(());
}

pub fn take_notices(session: &Session) -> Result<Vec<Notice>> {
    return Ok(session.remove(NOTICES_KEY)?.unwrap_or_default());
}
