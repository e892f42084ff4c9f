use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Postgres, QueryBuilder, Row};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::{Player, PlayerUpdate};
use crate::db::counter_column;
use crate::shared::{AppError, EntityId};

/// Trait for player repository operations
#[async_trait]
pub trait PlayerRepository {
    async fn create_player(&self, player: &Player) -> Result<(), AppError>;
    async fn get_player(&self, player_id: &EntityId) -> Result<Option<Player>, AppError>;

    /// Lists players in store insertion order
    async fn list_players(&self) -> Result<Vec<Player>, AppError>;

    /// Applies all updates to one player as a single write and returns the
    /// updated record. Fails with `NotFound` when the player does not exist.
    async fn update_player(
        &self,
        player_id: &EntityId,
        updates: &[PlayerUpdate],
    ) -> Result<Player, AppError>;

    async fn delete_player(&self, player_id: &EntityId) -> Result<(), AppError>;
}

/// In-memory implementation of PlayerRepository for development and testing
///
/// Players are kept in a `Vec` so listing reflects insertion order.
pub struct InMemoryPlayerRepository {
    players: RwLock<Vec<Player>>,
}

impl Default for InMemoryPlayerRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPlayerRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            players: RwLock::new(Vec::new()),
        }
    }

    /// Returns the current number of players in the repository
    pub async fn player_count(&self) -> usize {
        self.players.read().await.len()
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    #[instrument(skip(self, player))]
    async fn create_player(&self, player: &Player) -> Result<(), AppError> {
        debug!(player_id = %player.id, name = %player.name, "Creating player in memory");

        let mut players = self.players.write().await;
        if players.iter().any(|p| p.id == player.id) {
            warn!(player_id = %player.id, "Player already exists in memory");
            return Err(AppError::DatabaseError("Player already exists".to_string()));
        }
        players.push(player.clone());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_player(&self, player_id: &EntityId) -> Result<Option<Player>, AppError> {
        let players = self.players.read().await;
        let player = players.iter().find(|p| p.id == *player_id).cloned();

        match &player {
            Some(p) => debug!(player_id = %player_id, name = %p.name, "Player found in memory"),
            None => debug!(player_id = %player_id, "Player not found in memory"),
        }

        Ok(player)
    }

    #[instrument(skip(self))]
    async fn list_players(&self) -> Result<Vec<Player>, AppError> {
        Ok(self.players.read().await.clone())
    }

    #[instrument(skip(self, updates))]
    async fn update_player(
        &self,
        player_id: &EntityId,
        updates: &[PlayerUpdate],
    ) -> Result<Player, AppError> {
        debug!(player_id = %player_id, field_count = updates.len(), "Updating player in memory");

        let mut players = self.players.write().await;
        let player = players
            .iter_mut()
            .find(|p| p.id == *player_id)
            .ok_or_else(|| {
                warn!(player_id = %player_id, "Player not found for update in memory");
                AppError::NotFound("Player not found".to_string())
            })?;

        for update in updates {
            player.apply(update);
        }

        Ok(player.clone())
    }

    #[instrument(skip(self))]
    async fn delete_player(&self, player_id: &EntityId) -> Result<(), AppError> {
        let mut players = self.players.write().await;
        let before = players.len();
        players.retain(|p| p.id != *player_id);

        if players.len() == before {
            warn!(player_id = %player_id, "Player not found for deletion in memory");
            return Err(AppError::NotFound("Player not found".to_string()));
        }

        debug!(player_id = %player_id, "Player deleted from memory");
        Ok(())
    }
}

const PLAYER_COLUMNS: &str = "id, name, age, position, fun_fact, goals, assists, games_played, \
     man_of_the_match, active, created, team_id";

/// PostgreSQL implementation of player repository
pub struct PostgresPlayerRepository {
    pool: PgPool,
}

impl PostgresPlayerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn player_from_row(row: &PgRow) -> Result<Player, sqlx::Error> {
    Ok(Player {
        id: row.try_get::<Uuid, _>("id")?.into(),
        name: row.try_get("name")?,
        age: counter_column(row, "age")?,
        position: row.try_get("position")?,
        fun_fact: row.try_get("fun_fact")?,
        goals: counter_column(row, "goals")?,
        assists: counter_column(row, "assists")?,
        games_played: counter_column(row, "games_played")?,
        man_of_the_match: counter_column(row, "man_of_the_match")?,
        active: row.try_get("active")?,
        created: row.try_get("created")?,
        team_id: row.try_get::<Uuid, _>("team_id")?.into(),
    })
}

fn store_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        warn!(error = %e, operation, "Player query failed");
        AppError::DatabaseError(e.to_string())
    }
}

#[async_trait]
impl PlayerRepository for PostgresPlayerRepository {
    #[instrument(skip(self, player))]
    async fn create_player(&self, player: &Player) -> Result<(), AppError> {
        debug!(player_id = %player.id, name = %player.name, "Creating player in database");

        sqlx::query(
            "INSERT INTO players (id, name, age, position, fun_fact, goals, assists, games_played, \
             man_of_the_match, active, created, team_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(player.id.as_uuid())
        .bind(&player.name)
        .bind(i64::from(player.age))
        .bind(&player.position)
        .bind(&player.fun_fact)
        .bind(i64::from(player.goals))
        .bind(i64::from(player.assists))
        .bind(i64::from(player.games_played))
        .bind(i64::from(player.man_of_the_match))
        .bind(player.active)
        .bind(player.created)
        .bind(player.team_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(store_error("create_player"))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_player(&self, player_id: &EntityId) -> Result<Option<Player>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM players WHERE id = $1", PLAYER_COLUMNS))
            .bind(player_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error("get_player"))?;

        row.as_ref()
            .map(player_from_row)
            .transpose()
            .map_err(store_error("get_player"))
    }

    #[instrument(skip(self))]
    async fn list_players(&self) -> Result<Vec<Player>, AppError> {
        let rows = sqlx::query(&format!("SELECT {} FROM players ORDER BY seq", PLAYER_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(store_error("list_players"))?;

        rows.iter()
            .map(player_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(store_error("list_players"))
    }

    #[instrument(skip(self, updates))]
    async fn update_player(
        &self,
        player_id: &EntityId,
        updates: &[PlayerUpdate],
    ) -> Result<Player, AppError> {
        if updates.is_empty() {
            return Err(AppError::Validation("No fields to update".to_string()));
        }

        // Column names come from the closed PlayerUpdate enum, values are bound.
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE players SET ");
        let mut assignments = builder.separated(", ");
        for update in updates {
            assignments.push(format!("{} = ", update.field()));
            match update {
                PlayerUpdate::Name(v) | PlayerUpdate::Position(v) | PlayerUpdate::FunFact(v) => {
                    assignments.push_bind_unseparated(v.clone());
                }
                PlayerUpdate::Age(n)
                | PlayerUpdate::Goals(n)
                | PlayerUpdate::Assists(n)
                | PlayerUpdate::GamesPlayed(n)
                | PlayerUpdate::ManOfTheMatch(n) => {
                    assignments.push_bind_unseparated(i64::from(*n));
                }
                PlayerUpdate::Active(active) => {
                    assignments.push_bind_unseparated(*active);
                }
            }
        }
        builder
            .push(" WHERE id = ")
            .push_bind(player_id.as_uuid())
            .push(" RETURNING ")
            .push(PLAYER_COLUMNS);

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error("update_player"))?;

        match row {
            Some(row) => player_from_row(&row).map_err(store_error("update_player")),
            None => {
                warn!(player_id = %player_id, "Player not found for update");
                Err(AppError::NotFound("Player not found".to_string()))
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_player(&self, player_id: &EntityId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(player_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(store_error("delete_player"))?;

        if result.rows_affected() == 0 {
            warn!(player_id = %player_id, "Player not found for deletion");
            return Err(AppError::NotFound("Player not found".to_string()));
        }

        Ok(())
    }
}
