use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::HashMap;
use std::str::FromStr;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::{EventLogs, Fixture, Location};
use crate::shared::{AppError, EntityId};
use crate::stats::StatKind;

/// Trait for fixture repository operations
#[async_trait]
pub trait FixtureRepository {
    async fn create_fixture(&self, fixture: &Fixture) -> Result<(), AppError>;
    async fn get_fixture(&self, fixture_id: &EntityId) -> Result<Option<Fixture>, AppError>;

    /// Lists fixtures in store insertion order
    async fn list_fixtures(&self) -> Result<Vec<Fixture>, AppError>;

    /// Atomically appends one `(player id, name snapshot)` entry to the
    /// fixture's event log for `kind`. Fails with `NotFound` when the
    /// fixture does not exist; nothing is written in that case.
    ///
    /// A `ManOfTheMatch` entry also points the fixture's `man_of_the_match`
    /// at the player in the same write, so the reference always names the
    /// latest award in the log.
    async fn append_event(
        &self,
        fixture_id: &EntityId,
        kind: StatKind,
        player_id: &EntityId,
        player_name: &str,
    ) -> Result<(), AppError>;

    /// Total occurrences of `player_id` across every fixture's `kind` log
    async fn count_events(&self, player_id: &EntityId, kind: StatKind) -> Result<u64, AppError>;
}

/// In-memory implementation of FixtureRepository for development and testing
pub struct InMemoryFixtureRepository {
    fixtures: RwLock<Vec<Fixture>>,
}

impl Default for InMemoryFixtureRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryFixtureRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            fixtures: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl FixtureRepository for InMemoryFixtureRepository {
    #[instrument(skip(self, fixture))]
    async fn create_fixture(&self, fixture: &Fixture) -> Result<(), AppError> {
        debug!(fixture_id = %fixture.id, home = %fixture.home_team, away = %fixture.away_team, "Creating fixture in memory");

        let mut fixtures = self.fixtures.write().await;
        if fixtures.iter().any(|f| f.id == fixture.id) {
            warn!(fixture_id = %fixture.id, "Fixture already exists in memory");
            return Err(AppError::DatabaseError("Fixture already exists".to_string()));
        }
        fixtures.push(fixture.clone());

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_fixture(&self, fixture_id: &EntityId) -> Result<Option<Fixture>, AppError> {
        let fixtures = self.fixtures.read().await;
        Ok(fixtures.iter().find(|f| f.id == *fixture_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_fixtures(&self) -> Result<Vec<Fixture>, AppError> {
        Ok(self.fixtures.read().await.clone())
    }

    #[instrument(skip(self))]
    async fn append_event(
        &self,
        fixture_id: &EntityId,
        kind: StatKind,
        player_id: &EntityId,
        player_name: &str,
    ) -> Result<(), AppError> {
        let mut fixtures = self.fixtures.write().await;
        let fixture = fixtures
            .iter_mut()
            .find(|f| f.id == *fixture_id)
            .ok_or_else(|| AppError::NotFound(format!("Fixture {} not found", fixture_id)))?;

        fixture
            .events
            .push(kind, *player_id, player_name.to_string());
        if kind == StatKind::ManOfTheMatch {
            fixture.man_of_the_match = Some(*player_id);
        }

        debug!(fixture_id = %fixture_id, %kind, player_id = %player_id, "Event appended in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_events(&self, player_id: &EntityId, kind: StatKind) -> Result<u64, AppError> {
        let fixtures = self.fixtures.read().await;
        Ok(fixtures
            .iter()
            .map(|f| f.events.occurrences(player_id, kind))
            .sum())
    }
}

const FIXTURE_COLUMNS: &str =
    "id, date, home_team, away_team, home_score, away_score, man_of_the_match, latitude, longitude";

/// PostgreSQL implementation of fixture repository
///
/// Events are stored one row per entry in `fixture_events`, ordered by a
/// serial column, so an id and its name snapshot are always written together.
pub struct PostgresFixtureRepository {
    pool: PgPool,
}

impl PostgresFixtureRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_events(
        &self,
        fixture_id: Option<&EntityId>,
    ) -> Result<HashMap<EntityId, EventLogs>, AppError> {
        let rows = match fixture_id {
            Some(id) => {
                sqlx::query(
                    "SELECT fixture_id, stat_kind, player_id, player_name FROM fixture_events \
                     WHERE fixture_id = $1 ORDER BY seq",
                )
                .bind(id.as_uuid())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    "SELECT fixture_id, stat_kind, player_id, player_name FROM fixture_events ORDER BY seq",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(store_error("load_events"))?;

        let mut logs: HashMap<EntityId, EventLogs> = HashMap::new();
        for row in &rows {
            let (fixture_id, kind, player_id, player_name) =
                event_from_row(row).map_err(store_error("load_events"))?;
            logs.entry(fixture_id)
                .or_default()
                .push(kind, player_id, player_name);
        }

        Ok(logs)
    }
}

fn event_from_row(row: &PgRow) -> Result<(EntityId, StatKind, EntityId, String), sqlx::Error> {
    let raw_kind: String = row.try_get("stat_kind")?;
    let kind = StatKind::from_str(&raw_kind).map_err(|e| sqlx::Error::ColumnDecode {
        index: "stat_kind".to_string(),
        source: Box::new(e),
    })?;

    Ok((
        row.try_get::<Uuid, _>("fixture_id")?.into(),
        kind,
        row.try_get::<Uuid, _>("player_id")?.into(),
        row.try_get("player_name")?,
    ))
}

fn fixture_from_row(row: &PgRow) -> Result<Fixture, sqlx::Error> {
    let latitude: Option<f64> = row.try_get("latitude")?;
    let longitude: Option<f64> = row.try_get("longitude")?;

    Ok(Fixture {
        id: row.try_get::<Uuid, _>("id")?.into(),
        date: row.try_get("date")?,
        home_team: row.try_get("home_team")?,
        away_team: row.try_get("away_team")?,
        home_score: row.try_get("home_score")?,
        away_score: row.try_get("away_score")?,
        man_of_the_match: row
            .try_get::<Option<Uuid>, _>("man_of_the_match")?
            .map(EntityId::from),
        location: latitude
            .zip(longitude)
            .map(|(latitude, longitude)| Location {
                latitude,
                longitude,
            }),
        events: EventLogs::default(),
    })
}

fn store_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        warn!(error = %e, operation, "Fixture query failed");
        AppError::DatabaseError(e.to_string())
    }
}

#[async_trait]
impl FixtureRepository for PostgresFixtureRepository {
    #[instrument(skip(self, fixture))]
    async fn create_fixture(&self, fixture: &Fixture) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO fixtures (id, date, home_team, away_team, home_score, away_score, \
             man_of_the_match, latitude, longitude) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(fixture.id.as_uuid())
        .bind(fixture.date)
        .bind(&fixture.home_team)
        .bind(&fixture.away_team)
        .bind(&fixture.home_score)
        .bind(&fixture.away_score)
        .bind(fixture.man_of_the_match.map(|id| id.as_uuid()))
        .bind(fixture.location.map(|l| l.latitude))
        .bind(fixture.location.map(|l| l.longitude))
        .execute(&self.pool)
        .await
        .map_err(store_error("create_fixture"))?;

        debug!(fixture_id = %fixture.id, "Fixture created in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_fixture(&self, fixture_id: &EntityId) -> Result<Option<Fixture>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM fixtures WHERE id = $1", FIXTURE_COLUMNS))
            .bind(fixture_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error("get_fixture"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut fixture = fixture_from_row(&row).map_err(store_error("get_fixture"))?;
        if let Some(events) = self.load_events(Some(fixture_id)).await?.remove(fixture_id) {
            fixture.events = events;
        }

        Ok(Some(fixture))
    }

    #[instrument(skip(self))]
    async fn list_fixtures(&self) -> Result<Vec<Fixture>, AppError> {
        let rows = sqlx::query(&format!("SELECT {} FROM fixtures ORDER BY seq", FIXTURE_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(store_error("list_fixtures"))?;

        let mut events = self.load_events(None).await?;
        let mut fixtures = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut fixture = fixture_from_row(row).map_err(store_error("list_fixtures"))?;
            if let Some(logs) = events.remove(&fixture.id) {
                fixture.events = logs;
            }
            fixtures.push(fixture);
        }

        Ok(fixtures)
    }

    #[instrument(skip(self))]
    async fn append_event(
        &self,
        fixture_id: &EntityId,
        kind: StatKind,
        player_id: &EntityId,
        player_name: &str,
    ) -> Result<(), AppError> {
        // Single statement: the existence check, the reference update and the
        // insert cannot interleave
        let result = sqlx::query(
            "WITH target AS ( \
                 UPDATE fixtures SET man_of_the_match = CASE WHEN $5 THEN $3 ELSE man_of_the_match END \
                 WHERE id = $1 RETURNING id \
             ) \
             INSERT INTO fixture_events (fixture_id, stat_kind, player_id, player_name) \
             SELECT id, $2, $3, $4 FROM target",
        )
        .bind(fixture_id.as_uuid())
        .bind(kind.as_ref())
        .bind(player_id.as_uuid())
        .bind(player_name)
        .bind(kind == StatKind::ManOfTheMatch)
        .execute(&self.pool)
        .await
        .map_err(store_error("append_event"))?;

        if result.rows_affected() == 0 {
            warn!(fixture_id = %fixture_id, "Fixture not found for event append");
            return Err(AppError::NotFound(format!("Fixture {} not found", fixture_id)));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn count_events(&self, player_id: &EntityId, kind: StatKind) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM fixture_events WHERE player_id = $1 AND stat_kind = $2",
        )
        .bind(player_id.as_uuid())
        .bind(kind.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(store_error("count_events"))?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::models::NewFixture;
    use chrono::NaiveDate;

    fn create_test_fixture(day: u32) -> Fixture {
        Fixture::new(NewFixture {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            home_team: "Seeded FC".to_string(),
            away_team: "Rovers".to_string(),
            home_score: "1".to_string(),
            away_score: "0".to_string(),
            man_of_the_match: None,
            location: None,
        })
    }

    #[tokio::test]
    async fn test_create_and_get_fixture() {
        let repo = InMemoryFixtureRepository::new();
        let fixture = create_test_fixture(1);
        repo.create_fixture(&fixture).await.unwrap();

        let retrieved = repo.get_fixture(&fixture.id).await.unwrap().unwrap();
        assert_eq!(retrieved, fixture);
        assert!(repo.get_fixture(&EntityId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_append_event_to_missing_fixture_writes_nothing() {
        let repo = InMemoryFixtureRepository::new();
        let fixture = create_test_fixture(1);
        repo.create_fixture(&fixture).await.unwrap();

        let result = repo
            .append_event(&EntityId::new(), StatKind::Goal, &EntityId::new(), "Alex")
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
        let untouched = repo.get_fixture(&fixture.id).await.unwrap().unwrap();
        assert!(untouched.events.get(StatKind::Goal).is_none());
    }

    #[tokio::test]
    async fn test_count_events_sums_across_fixtures() {
        let repo = InMemoryFixtureRepository::new();
        let alex = EntityId::new();
        let sam = EntityId::new();
        let first = create_test_fixture(1);
        let second = create_test_fixture(2);
        repo.create_fixture(&first).await.unwrap();
        repo.create_fixture(&second).await.unwrap();

        repo.append_event(&first.id, StatKind::Goal, &alex, "Alex").await.unwrap();
        repo.append_event(&first.id, StatKind::Goal, &sam, "Sam").await.unwrap();
        repo.append_event(&second.id, StatKind::Goal, &alex, "Alex").await.unwrap();
        repo.append_event(&second.id, StatKind::Assist, &alex, "Alex").await.unwrap();

        assert_eq!(repo.count_events(&alex, StatKind::Goal).await.unwrap(), 2);
        assert_eq!(repo.count_events(&sam, StatKind::Goal).await.unwrap(), 1);
        assert_eq!(repo.count_events(&alex, StatKind::Assist).await.unwrap(), 1);
        assert_eq!(repo.count_events(&sam, StatKind::ManOfTheMatch).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_motm_event_moves_fixture_reference() {
        let repo = InMemoryFixtureRepository::new();
        let alex = EntityId::new();
        let jamie = EntityId::new();
        let fixture = create_test_fixture(1);
        repo.create_fixture(&fixture).await.unwrap();

        repo.append_event(&fixture.id, StatKind::ManOfTheMatch, &alex, "Alex").await.unwrap();
        repo.append_event(&fixture.id, StatKind::Goal, &jamie, "Jamie").await.unwrap();
        let stored = repo.get_fixture(&fixture.id).await.unwrap().unwrap();
        assert_eq!(stored.man_of_the_match, Some(alex));

        repo.append_event(&fixture.id, StatKind::ManOfTheMatch, &jamie, "Jamie").await.unwrap();
        let stored = repo.get_fixture(&fixture.id).await.unwrap().unwrap();
        assert_eq!(stored.man_of_the_match, Some(jamie));
        assert_eq!(
            stored.events.get(StatKind::ManOfTheMatch).unwrap().player_ids(),
            &[alex, jamie]
        );
    }
}
