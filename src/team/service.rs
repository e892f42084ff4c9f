use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{models::Team, repository::TeamRepository, types::AddTeamRequest};
use crate::shared::{AppError, EntityId};

/// Service for handling team business logic
pub struct TeamService {
    repository: Arc<dyn TeamRepository + Send + Sync>,
}

impl TeamService {
    pub fn new(repository: Arc<dyn TeamRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    /// Creates a team; names must be non-empty and unique
    #[instrument(skip(self))]
    pub async fn add_team(&self, request: AddTeamRequest) -> Result<Team, AppError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Team name is required".to_string()));
        }

        if self.repository.get_team_by_name(name).await?.is_some() {
            return Err(AppError::Validation(format!("Team {} already exists", name)));
        }

        let team = Team::new(name.to_string(), request.coach, request.founded);
        self.repository.create_team(&team).await?;

        info!(team_id = %team.id, name = %team.name, "Team created successfully");
        Ok(team)
    }

    #[instrument(skip(self))]
    pub async fn get_team(&self, team_id: &str) -> Result<Team, AppError> {
        let team_id = EntityId::parse(team_id)?;
        self.repository
            .get_team(&team_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", team_id)))
    }

    #[instrument(skip(self))]
    pub async fn get_team_by_name(&self, name: &str) -> Result<Team, AppError> {
        self.repository
            .get_team_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", name)))
    }

    #[instrument(skip(self))]
    pub async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        let teams = self.repository.list_teams().await?;
        debug!(team_count = teams.len(), "Teams listed");
        Ok(teams)
    }
}
