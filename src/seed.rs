use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use rand::{rngs::StdRng, seq::IndexedRandom, Rng, SeedableRng};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::fixture::types::AddFixtureRequest;
use crate::player::{models::NewPlayer, PlayerService};
use crate::shared::{AppError, AppState, EntityId};
use crate::stats::StatKind;
use crate::team::{types::AddTeamRequest, TeamService};

pub const SEED_TEAM_NAME: &str = "Seeded FC";
const SEED_FIXTURE_COUNT: usize = 3;

const NAMES: [&str; 10] = [
    "Alex", "Jamie", "Chris", "Taylor", "Jordan", "Morgan", "Casey", "Riley", "Drew", "Sam",
];
const POSITIONS: [&str; 10] = ["GK", "CB", "LB", "RB", "CM", "CDM", "CAM", "LW", "RW", "ST"];
const FUN_FACTS: [&str; 10] = [
    "Loves pizza",
    "Can juggle",
    "Fastest runner",
    "Team joker",
    "Plays guitar",
    "Chess champion",
    "Speaks 3 languages",
    "Has a pet snake",
    "Never late",
    "Wears lucky socks",
];

#[derive(Debug, Clone, Serialize)]
pub struct SeedReport {
    pub team_id: EntityId,
    pub player_ids: Vec<EntityId>,
    pub fixture_ids: Vec<EntityId>,
}

/// One generated match: who played, who scored and assisted, and the man
/// of the match (all indices into the seeded squad)
struct PlannedFixture {
    opponent: String,
    days_ago: i64,
    away_goals: u32,
    scorers: Vec<usize>,
    assisters: Vec<usize>,
    man_of_the_match: usize,
}

/// Populates the store with a squad and a few played fixtures.
///
/// Every stat goes through the stats coordinator, so the seeded counters
/// always agree with the fixture event logs. Reuses the seed team when it
/// already exists.
pub struct Seeder {
    state: AppState,
}

impl Seeder {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    #[instrument(skip(self))]
    pub async fn seed(&self) -> Result<SeedReport, AppError> {
        let teams = TeamService::new(Arc::clone(&self.state.team_repository));
        let players = PlayerService::new(
            Arc::clone(&self.state.player_repository),
            Arc::clone(&self.state.team_repository),
        );

        let team = match self
            .state
            .team_repository
            .get_team_by_name(SEED_TEAM_NAME)
            .await?
        {
            Some(team) => team,
            None => {
                teams
                    .add_team(AddTeamRequest {
                        name: SEED_TEAM_NAME.to_string(),
                        coach: "Coach Random".to_string(),
                        founded: 2024,
                    })
                    .await?
            }
        };

        let mut rng = StdRng::from_os_rng();
        let ages: Vec<u32> = (0..NAMES.len()).map(|_| rng.random_range(18..28)).collect();
        let plan = plan_fixtures(&mut rng, NAMES.len());

        let mut player_ids = Vec::with_capacity(NAMES.len());
        for (i, age) in ages.into_iter().enumerate() {
            let player = players
                .add_player(NewPlayer {
                    name: NAMES[i].to_string(),
                    age,
                    position: POSITIONS[i].to_string(),
                    fun_fact: FUN_FACTS[i].to_string(),
                    team_id: team.id,
                })
                .await?;
            player_ids.push(player.id);
        }

        let today = Utc::now().date_naive();
        let mut fixture_ids = Vec::with_capacity(plan.len());
        for planned in plan {
            let date = today - Duration::days(planned.days_ago);
            let view = self
                .state
                .stats_service
                .add_fixture(AddFixtureRequest {
                    date: date.format("%Y-%m-%d").to_string(),
                    home_team: team.name.clone(),
                    away_team: planned.opponent,
                    home_score: planned.scorers.len().to_string(),
                    away_score: planned.away_goals.to_string(),
                    man_of_the_match: Some(player_ids[planned.man_of_the_match].to_string()),
                    latitude: None,
                    longitude: None,
                })
                .await?;
            let fixture_id = view.fixture.id;

            let events = player_ids
                .iter()
                .map(|id| (StatKind::Appearance, *id))
                .chain(planned.scorers.iter().map(|&i| (StatKind::Goal, player_ids[i])))
                .chain(planned.assisters.iter().map(|&i| (StatKind::Assist, player_ids[i])));

            for (kind, player_id) in events {
                self.state
                    .stats_service
                    .add_stat_to_fixture(&fixture_id, &player_id, kind)
                    .await?;
            }
            fixture_ids.push(fixture_id);
        }

        info!(
            team_id = %team.id,
            player_count = player_ids.len(),
            fixture_count = fixture_ids.len(),
            "Seed data created"
        );
        Ok(SeedReport {
            team_id: team.id,
            player_ids,
            fixture_ids,
        })
    }
}

fn plan_fixtures(rng: &mut StdRng, squad_size: usize) -> Vec<PlannedFixture> {
    let squad: Vec<usize> = (0..squad_size).collect();

    let mut plan = Vec::with_capacity(SEED_FIXTURE_COUNT);
    for week in 0..SEED_FIXTURE_COUNT {
        let goals = rng.random_range(0..5);
        let mut scorers = Vec::with_capacity(goals);
        let mut assisters = Vec::new();
        for _ in 0..goals {
            if let Some(&scorer) = squad.choose(&mut *rng) {
                scorers.push(scorer);
            }
            if rng.random_bool(0.6) {
                if let Some(&assister) = squad.choose(&mut *rng) {
                    assisters.push(assister);
                }
            }
        }

        plan.push(PlannedFixture {
            opponent: opponent_name(),
            days_ago: 7 * (week as i64 + 1),
            away_goals: rng.random_range(0..4),
            scorers,
            assisters,
            man_of_the_match: squad.choose(&mut *rng).copied().unwrap_or_default(),
        });
    }
    plan
}

/// "swift eagle" becomes "Swift Eagle FC"
fn opponent_name() -> String {
    let words = petname::Petnames::default().generate_one(2, " ");
    let titled: Vec<String> = words
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();
    format!("{} FC", titled.join(" "))
}

/// POST /api/seed
#[instrument(name = "seed", skip(state))]
pub async fn seed(State(state): State<AppState>) -> Result<Json<SeedReport>, AppError> {
    Ok(Json(Seeder::new(state).seed().await?))
}
