use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::Team;
use crate::shared::{AppError, EntityId};

/// Trait for team repository operations
#[async_trait]
pub trait TeamRepository {
    async fn create_team(&self, team: &Team) -> Result<(), AppError>;
    async fn get_team(&self, team_id: &EntityId) -> Result<Option<Team>, AppError>;
    async fn get_team_by_name(&self, name: &str) -> Result<Option<Team>, AppError>;

    /// Lists teams in store insertion order
    async fn list_teams(&self) -> Result<Vec<Team>, AppError>;

    /// Appends a player id to the team's member list
    async fn add_member(&self, team_id: &EntityId, player_id: &EntityId) -> Result<(), AppError>;
}

/// In-memory implementation of TeamRepository for development and testing
pub struct InMemoryTeamRepository {
    teams: RwLock<Vec<Team>>,
}

impl Default for InMemoryTeamRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTeamRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            teams: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    #[instrument(skip(self, team))]
    async fn create_team(&self, team: &Team) -> Result<(), AppError> {
        debug!(team_id = %team.id, name = %team.name, "Creating team in memory");

        let mut teams = self.teams.write().await;
        if teams.iter().any(|t| t.id == team.id || t.name == team.name) {
            warn!(team_id = %team.id, name = %team.name, "Team already exists in memory");
            return Err(AppError::Validation(format!(
                "Team {} already exists",
                team.name
            )));
        }
        teams.push(team.clone());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_team(&self, team_id: &EntityId) -> Result<Option<Team>, AppError> {
        let teams = self.teams.read().await;
        Ok(teams.iter().find(|t| t.id == *team_id).cloned())
    }

    #[instrument(skip(self))]
    async fn get_team_by_name(&self, name: &str) -> Result<Option<Team>, AppError> {
        let teams = self.teams.read().await;
        Ok(teams.iter().find(|t| t.name == name).cloned())
    }

    #[instrument(skip(self))]
    async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        Ok(self.teams.read().await.clone())
    }

    #[instrument(skip(self))]
    async fn add_member(&self, team_id: &EntityId, player_id: &EntityId) -> Result<(), AppError> {
        let mut teams = self.teams.write().await;
        let team = teams
            .iter_mut()
            .find(|t| t.id == *team_id)
            .ok_or_else(|| AppError::NotFound("Team not found".to_string()))?;

        team.players.push(*player_id);
        debug!(team_id = %team_id, player_id = %player_id, member_count = team.players.len(), "Player added to team");

        Ok(())
    }
}

/// PostgreSQL implementation of team repository
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn team_from_row(row: &PgRow) -> Result<Team, sqlx::Error> {
    let players: Vec<Uuid> = row.try_get("players")?;
    Ok(Team {
        id: row.try_get::<Uuid, _>("id")?.into(),
        name: row.try_get("name")?,
        coach: row.try_get("coach")?,
        founded: row.try_get("founded")?,
        players: players.into_iter().map(EntityId::from).collect(),
        created: row.try_get("created")?,
    })
}

fn store_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        warn!(error = %e, operation, "Team query failed");
        match e.as_database_error().and_then(|db| db.code()) {
            // unique_violation on teams.name
            Some(code) if code == "23505" => {
                AppError::Validation("Team name already exists".to_string())
            }
            _ => AppError::DatabaseError(e.to_string()),
        }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    #[instrument(skip(self, team))]
    async fn create_team(&self, team: &Team) -> Result<(), AppError> {
        let players: Vec<Uuid> = team.players.iter().map(EntityId::as_uuid).collect();

        sqlx::query(
            "INSERT INTO teams (id, name, coach, founded, players, created) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(team.id.as_uuid())
        .bind(&team.name)
        .bind(&team.coach)
        .bind(team.founded)
        .bind(players)
        .bind(team.created)
        .execute(&self.pool)
        .await
        .map_err(store_error("create_team"))?;

        debug!(team_id = %team.id, "Team created in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_team(&self, team_id: &EntityId) -> Result<Option<Team>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, coach, founded, players, created FROM teams WHERE id = $1",
        )
        .bind(team_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("get_team"))?;

        row.as_ref()
            .map(team_from_row)
            .transpose()
            .map_err(store_error("get_team"))
    }

    #[instrument(skip(self))]
    async fn get_team_by_name(&self, name: &str) -> Result<Option<Team>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, coach, founded, players, created FROM teams WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error("get_team_by_name"))?;

        row.as_ref()
            .map(team_from_row)
            .transpose()
            .map_err(store_error("get_team_by_name"))
    }

    #[instrument(skip(self))]
    async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, coach, founded, players, created FROM teams ORDER BY seq",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_error("list_teams"))?;

        rows.iter()
            .map(team_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(store_error("list_teams"))
    }

    #[instrument(skip(self))]
    async fn add_member(&self, team_id: &EntityId, player_id: &EntityId) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE teams SET players = array_append(players, $2) WHERE id = $1")
            .bind(team_id.as_uuid())
            .bind(player_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(store_error("add_member"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Team not found".to_string()));
        }

        Ok(())
    }
}
