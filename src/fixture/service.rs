use chrono::{DateTime, NaiveDate};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{
    models::{Fixture, FixtureView, Location, NewFixture},
    repository::FixtureRepository,
    types::AddFixtureRequest,
};
use crate::player::repository::PlayerRepository;
use crate::shared::{AppError, EntityId};

/// Service for fixture creation and the read-side fixture views
pub struct FixtureService {
    fixtures: Arc<dyn FixtureRepository + Send + Sync>,
    players: Arc<dyn PlayerRepository + Send + Sync>,
}

impl FixtureService {
    pub fn new(
        fixtures: Arc<dyn FixtureRepository + Send + Sync>,
        players: Arc<dyn PlayerRepository + Send + Sync>,
    ) -> Self {
        Self { fixtures, players }
    }

    /// Creates a fixture and hands back the requested man of the match.
    ///
    /// The fixture is stored without a man of the match: the award is an
    /// event, so the caller records it through `StatsService` once the
    /// fixture exists. A supplied player must exist. Coordinates are kept
    /// only when both are given.
    #[instrument(skip(self))]
    pub async fn add_fixture(
        &self,
        request: AddFixtureRequest,
    ) -> Result<(Fixture, Option<EntityId>), AppError> {
        let date = parse_fixture_date(&request.date)?;

        let home_team = request.home_team.trim().to_string();
        let away_team = request.away_team.trim().to_string();
        if home_team.is_empty() || away_team.is_empty() {
            return Err(AppError::Validation(
                "Both home and away team names are required".to_string(),
            ));
        }

        let man_of_the_match = request
            .man_of_the_match
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(EntityId::parse)
            .transpose()?;
        if let Some(player_id) = &man_of_the_match {
            if self.players.get_player(player_id).await?.is_none() {
                return Err(AppError::NotFound(format!("Player {} not found", player_id)));
            }
        }

        let location = request
            .latitude
            .zip(request.longitude)
            .map(|(latitude, longitude)| Location {
                latitude,
                longitude,
            });

        let fixture = Fixture::new(NewFixture {
            date,
            home_team,
            away_team,
            home_score: request.home_score,
            away_score: request.away_score,
            man_of_the_match: None,
            location,
        });
        self.fixtures.create_fixture(&fixture).await?;

        info!(
            fixture_id = %fixture.id,
            home = %fixture.home_team,
            away = %fixture.away_team,
            "Fixture created successfully"
        );
        Ok((fixture, man_of_the_match))
    }

    /// Fixture view with the man of the match resolved to a name
    #[instrument(skip(self))]
    pub async fn get_fixture(&self, fixture_id: &EntityId) -> Result<FixtureView, AppError> {
        let fixture = self
            .fixtures
            .get_fixture(fixture_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Fixture {} not found", fixture_id)))?;

        let man_of_the_match_name = match fixture.man_of_the_match {
            Some(player_id) => self.players.get_player(&player_id).await?.map(|p| p.name),
            None => None,
        };

        Ok(FixtureView {
            fixture,
            man_of_the_match_name,
        })
    }

    #[instrument(skip(self))]
    pub async fn list_fixtures(&self) -> Result<Vec<FixtureView>, AppError> {
        let fixtures = self.fixtures.list_fixtures().await?;
        self.views(fixtures).await
    }

    /// Joins each fixture's man of the match against the player store.
    /// Absent or dangling references leave the name empty.
    pub async fn views(&self, fixtures: Vec<Fixture>) -> Result<Vec<FixtureView>, AppError> {
        if fixtures.iter().all(|f| f.man_of_the_match.is_none()) {
            return Ok(fixtures
                .into_iter()
                .map(|fixture| FixtureView {
                    fixture,
                    man_of_the_match_name: None,
                })
                .collect());
        }

        let names: HashMap<EntityId, String> = self
            .players
            .list_players()
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();
        debug!(fixture_count = fixtures.len(), "Joining man of the match names");

        Ok(fixtures
            .into_iter()
            .map(|fixture| {
                let man_of_the_match_name = fixture
                    .man_of_the_match
                    .and_then(|id| names.get(&id).cloned());
                FixtureView {
                    fixture,
                    man_of_the_match_name,
                }
            })
            .collect())
    }
}

/// Accepts a plain `YYYY-MM-DD` date or an RFC 3339 timestamp
fn parse_fixture_date(raw: &str) -> Result<NaiveDate, AppError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| AppError::Validation(format!("Invalid fixture date: {:?}", raw)))
}
