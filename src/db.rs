use sqlx::{postgres::PgPoolOptions, postgres::PgRow, PgPool, Row};
use std::time::Duration;
use tracing::{info, instrument};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS teams (
        seq BIGSERIAL,
        id UUID PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        coach TEXT NOT NULL,
        founded INTEGER NOT NULL,
        players UUID[] NOT NULL DEFAULT '{}',
        created TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS players (
        seq BIGSERIAL,
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        age BIGINT NOT NULL,
        position TEXT NOT NULL,
        fun_fact TEXT NOT NULL,
        goals BIGINT NOT NULL DEFAULT 0 CHECK (goals >= 0),
        assists BIGINT NOT NULL DEFAULT 0 CHECK (assists >= 0),
        games_played BIGINT NOT NULL DEFAULT 0 CHECK (games_played >= 0),
        man_of_the_match BIGINT NOT NULL DEFAULT 0 CHECK (man_of_the_match >= 0),
        active BOOLEAN NOT NULL DEFAULT TRUE,
        created TIMESTAMPTZ NOT NULL,
        team_id UUID NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS fixtures (
        seq BIGSERIAL,
        id UUID PRIMARY KEY,
        date DATE NOT NULL,
        home_team TEXT NOT NULL,
        away_team TEXT NOT NULL,
        home_score TEXT NOT NULL,
        away_score TEXT NOT NULL,
        man_of_the_match UUID,
        latitude DOUBLE PRECISION,
        longitude DOUBLE PRECISION
    )",
    // player_id is a weak reference: deleting a player keeps its events
    "CREATE TABLE IF NOT EXISTS fixture_events (
        seq BIGSERIAL PRIMARY KEY,
        fixture_id UUID NOT NULL REFERENCES fixtures (id) ON DELETE CASCADE,
        stat_kind TEXT NOT NULL,
        player_id UUID NOT NULL,
        player_name TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS fixture_events_player_kind ON fixture_events (player_id, stat_kind)",
];

/// Opens the connection pool with a blanket acquire deadline
#[instrument(skip(database_url))]
pub async fn connect(database_url: &str, timeout: Duration) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(timeout)
        .connect(database_url)
        .await?;

    info!("Connected to PostgreSQL");
    Ok(pool)
}

/// Creates the tables if they do not exist yet
#[instrument(skip(pool))]
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    info!(statements = SCHEMA.len(), "Database schema ready");
    Ok(())
}

/// Reads a BIGINT column that holds a non-negative counter
pub(crate) fn counter_column(row: &PgRow, column: &str) -> Result<u32, sqlx::Error> {
    let value: i64 = row.try_get(column)?;
    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
