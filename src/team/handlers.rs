use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::Team,
    service::TeamService,
    types::{AddTeamRequest, TeamIdResponse, TeamNameQuery},
};
use crate::shared::{AppError, AppState, IdQuery};

/// POST /api/team/add?name=&coach=&founded=
#[instrument(name = "add_team", skip(state))]
pub async fn add_team(
    State(state): State<AppState>,
    Query(request): Query<AddTeamRequest>,
) -> Result<Json<Team>, AppError> {
    let service = TeamService::new(Arc::clone(&state.team_repository));
    let team = service.add_team(request).await?;

    Ok(Json(team))
}

/// GET /api/team/getbyid?id=
#[instrument(name = "get_team_by_id", skip(state))]
pub async fn get_team_by_id(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<Team>, AppError> {
    let service = TeamService::new(Arc::clone(&state.team_repository));
    Ok(Json(service.get_team(&query.id).await?))
}

/// GET /api/team/getidbyname?name=
#[instrument(name = "get_team_id_by_name", skip(state))]
pub async fn get_team_id_by_name(
    State(state): State<AppState>,
    Query(query): Query<TeamNameQuery>,
) -> Result<Json<TeamIdResponse>, AppError> {
    let service = TeamService::new(Arc::clone(&state.team_repository));
    let team = service.get_team_by_name(&query.name).await?;

    Ok(Json(TeamIdResponse { team_id: team.id }))
}

/// GET /api/team/getall
#[instrument(name = "list_teams", skip(state))]
pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<Team>>, AppError> {
    let service = TeamService::new(Arc::clone(&state.team_repository));
    let teams = service.list_teams().await?;

    info!(team_count = teams.len(), "Teams listed successfully");
    Ok(Json(teams))
}
