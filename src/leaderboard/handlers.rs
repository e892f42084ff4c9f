use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::instrument;

use super::service::LeaderboardService;
use crate::fixture::FixtureView;
use crate::player::{Player, PlayerCounter};
use crate::shared::{AppError, AppState};

pub const DEFAULT_LEADERBOARD_SIZE: usize = 5;

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
}

impl LeaderboardQuery {
    fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LEADERBOARD_SIZE)
    }
}

fn leaderboard_service(state: &AppState) -> LeaderboardService {
    LeaderboardService::new(
        Arc::clone(&state.player_repository),
        Arc::clone(&state.fixture_repository),
    )
}

/// GET /api/leaderboard/:stat where stat is goals, assists, motm or appearances
#[instrument(name = "player_leaderboard", skip(state))]
pub async fn player_leaderboard(
    State(state): State<AppState>,
    Path(stat): Path<String>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<Player>>, AppError> {
    let counter = PlayerCounter::from_str(&stat)
        .map_err(|_| AppError::Validation(format!("Unknown leaderboard stat: {:?}", stat)))?;

    let players = leaderboard_service(&state)
        .top_n(counter, query.limit())
        .await?;
    Ok(Json(players))
}

/// GET /api/leaderboard/fixtures
#[instrument(name = "recent_fixtures", skip(state))]
pub async fn recent_fixtures(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<FixtureView>>, AppError> {
    let fixtures = leaderboard_service(&state)
        .recent_fixtures(query.limit())
        .await?;
    Ok(Json(fixtures))
}
