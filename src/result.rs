use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Infrastructure failure surfaced from a handler, e.g. a broken session store.
///
/// Gameplay and score-store problems never travel this path; they are shown to
/// the player as notices instead.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.0)
    }
}

pub type Result<T = (), E = AppError> = anyhow::Result<T, E>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Something went wrong: {}", self),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_as_internal_server_error() {
        let err: AppError = anyhow::anyhow!("session store offline").into();

        assert_eq!(err.to_string(), "session store offline");
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
