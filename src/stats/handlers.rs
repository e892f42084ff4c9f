use axum::{
    extract::{Query, State},
    Json,
};
use std::str::FromStr;
use tracing::{instrument, warn};

use super::{
    models::StatKind,
    types::{AddStatQuery, FixturePlayerQuery},
};
use crate::fixture::FixtureView;
use crate::player::models::Player;
use crate::shared::{AppError, AppState, EntityId, IdQuery};

/// POST /api/fixture/addstat?fixtureId=&playerId=&stat=
#[instrument(name = "add_stat", skip(state))]
pub async fn add_stat(
    State(state): State<AppState>,
    Query(query): Query<AddStatQuery>,
) -> Result<Json<FixtureView>, AppError> {
    let kind = StatKind::from_str(query.stat.trim()).map_err(|_| {
        warn!(stat = %query.stat, "Unknown stat kind requested");
        AppError::Validation(format!("Unknown stat kind: {:?}", query.stat))
    })?;

    record(&state, &query.fixture_id, &query.player_id, kind).await
}

/// POST /api/fixture/addgoalscorer?fixtureId=&playerId=
#[instrument(name = "add_goalscorer", skip(state))]
pub async fn add_goalscorer(
    State(state): State<AppState>,
    Query(query): Query<FixturePlayerQuery>,
) -> Result<Json<FixtureView>, AppError> {
    record(&state, &query.fixture_id, &query.player_id, StatKind::Goal).await
}

/// POST /api/fixture/addassist?fixtureId=&playerId=
#[instrument(name = "add_assist", skip(state))]
pub async fn add_assist(
    State(state): State<AppState>,
    Query(query): Query<FixturePlayerQuery>,
) -> Result<Json<FixtureView>, AppError> {
    record(&state, &query.fixture_id, &query.player_id, StatKind::Assist).await
}

/// POST /api/player/resync?id=
#[instrument(name = "resync_player", skip(state))]
pub async fn resync_player(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Player>, AppError> {
    let player_id = EntityId::parse(&query.id)?;
    Ok(Json(state.stats_service.resync_player(&player_id).await?))
}

async fn record(
    state: &AppState,
    fixture_id: &str,
    player_id: &str,
    kind: StatKind,
) -> Result<Json<FixtureView>, AppError> {
    let fixture_id = EntityId::parse(fixture_id)?;
    let player_id = EntityId::parse(player_id)?;

    let view = state
        .stats_service
        .add_stat_to_fixture(&fixture_id, &player_id, kind)
        .await?;
    Ok(Json(view))
}
