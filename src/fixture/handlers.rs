use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::FixtureView,
    service::FixtureService,
    types::AddFixtureRequest,
};
use crate::shared::{AppError, AppState, EntityId};

fn fixture_service(state: &AppState) -> FixtureService {
    FixtureService::new(
        Arc::clone(&state.fixture_repository),
        Arc::clone(&state.player_repository),
    )
}

/// POST /api/fixture/add?date=&homeTeam=&awayTeam=&homeScore=&awayScore=&manOfTheMatch=&latitude=&longitude=
#[instrument(name = "add_fixture", skip(state))]
pub async fn add_fixture(
    State(state): State<AppState>,
    Query(request): Query<AddFixtureRequest>,
) -> Result<Json<FixtureView>, AppError> {
    let fixture = state.stats_service.add_fixture(request).await?;
    Ok(Json(fixture))
}

/// GET /api/fixture/getall
#[instrument(name = "list_fixtures", skip(state))]
pub async fn list_fixtures(
    State(state): State<AppState>,
) -> Result<Json<Vec<FixtureView>>, AppError> {
    let fixtures = fixture_service(&state).list_fixtures().await?;

    info!(fixture_count = fixtures.len(), "Fixtures listed successfully");
    Ok(Json(fixtures))
}

/// GET /api/fixture/:id
#[instrument(name = "get_fixture", skip(state))]
pub async fn get_fixture(
    State(state): State<AppState>,
    Path(fixture_id): Path<String>,
) -> Result<Json<FixtureView>, AppError> {
    let fixture_id = EntityId::parse(&fixture_id)?;
    Ok(Json(fixture_service(&state).get_fixture(&fixture_id).await?))
}
