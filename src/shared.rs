use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::fixture::repository::{FixtureRepository, InMemoryFixtureRepository};
use crate::player::repository::{InMemoryPlayerRepository, PlayerRepository};
use crate::stats::StatsService;
use crate::team::repository::{InMemoryTeamRepository, TeamRepository};

/// Shared application state containing all dependencies
///
/// This is the store context threaded through every handler; there is no
/// process-wide store handle.
#[derive(Clone)]
pub struct AppState {
    pub player_repository: Arc<dyn PlayerRepository + Send + Sync>,
    pub team_repository: Arc<dyn TeamRepository + Send + Sync>,
    pub fixture_repository: Arc<dyn FixtureRepository + Send + Sync>,
    /// Long-lived because it owns the per-player recount locks
    pub stats_service: Arc<StatsService>,
}

impl AppState {
    pub fn new(
        player_repository: Arc<dyn PlayerRepository + Send + Sync>,
        team_repository: Arc<dyn TeamRepository + Send + Sync>,
        fixture_repository: Arc<dyn FixtureRepository + Send + Sync>,
    ) -> Self {
        let stats_service = Arc::new(StatsService::new(
            Arc::clone(&player_repository),
            Arc::clone(&fixture_repository),
        ));

        Self {
            player_repository,
            team_repository,
            fixture_repository,
            stats_service,
        }
    }

    /// State backed entirely by in-memory repositories (development and tests)
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryPlayerRepository::new()),
            Arc::new(InMemoryTeamRepository::new()),
            Arc::new(InMemoryFixtureRepository::new()),
        )
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Invalid team id: {0}")]
    InvalidTeamId(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidId(msg) => (StatusCode::BAD_REQUEST, format!("Invalid id: {}", msg)),
            AppError::InvalidTeamId(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid team id: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// `?id=` query parameter, kept as a raw string so a malformed id surfaces
/// as `InvalidId` rather than an extractor rejection
#[derive(Debug, Clone, Deserialize)]
pub struct IdQuery {
    pub id: String,
}

/// Opaque identifier shared by players, teams and fixtures (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a client-supplied id. A malformed string is an `InvalidId`,
    /// never a `NotFound`.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        raw.parse()
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EntityId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for EntityId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| AppError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_round_trips_through_display() {
        let id = EntityId::new();
        let parsed = EntityId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_malformed_id_is_invalid_not_missing() {
        let result = EntityId::parse("not-an-id");
        assert!(matches!(result, Err(AppError::InvalidId(_))));

        let result = EntityId::parse("");
        assert!(matches!(result, Err(AppError::InvalidId(_))));
    }

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (AppError::InvalidId("x".into()), axum::http::StatusCode::BAD_REQUEST),
            (AppError::InvalidTeamId("x".into()), axum::http::StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".into()), axum::http::StatusCode::NOT_FOUND),
            (AppError::Validation("x".into()), axum::http::StatusCode::BAD_REQUEST),
            (
                AppError::DatabaseError("x".into()),
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
