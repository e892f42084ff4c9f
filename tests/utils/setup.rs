use chrono::NaiveDate;
use std::sync::Arc;

use fctracker::{
    config::AppConfig,
    fixture::{
        repository::{FixtureRepository, InMemoryFixtureRepository},
        types::AddFixtureRequest,
        FixtureService,
    },
    player::{
        models::NewPlayer,
        repository::{InMemoryPlayerRepository, PlayerRepository},
        PlayerService,
    },
    routes::create_router,
    team::{
        repository::{InMemoryTeamRepository, TeamRepository},
        types::AddTeamRequest,
        TeamService,
    },
    AppState, Fixture, Player, Team,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub state: AppState,
    pub app: axum::Router,
    pub team: Team,
    pub players: Vec<Player>,
    pub fixtures: Vec<Fixture>,
}

pub struct TestSetupBuilder {
    team_name: String,
    player_names: Vec<String>,
    fixture_count: usize,
    player_repository: Option<Arc<dyn PlayerRepository + Send + Sync>>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            team_name: "Seeded FC".to_string(),
            player_names: vec![],
            fixture_count: 0,
            player_repository: None,
        }
    }

    pub fn with_players(mut self, names: Vec<&str>) -> Self {
        self.player_names = names.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_squad(self) -> Self {
        self.with_players(vec!["Alex", "Jamie", "Chris", "Taylor"])
    }

    pub fn with_fixtures(mut self, count: usize) -> Self {
        self.fixture_count = count;
        self
    }

    pub fn with_player_repository(
        mut self,
        repository: Arc<dyn PlayerRepository + Send + Sync>,
    ) -> Self {
        self.player_repository = Some(repository);
        self
    }

    pub async fn build(self) -> TestSetup {
        let player_repository = self
            .player_repository
            .unwrap_or_else(|| Arc::new(InMemoryPlayerRepository::new()));
        let team_repository: Arc<dyn TeamRepository + Send + Sync> =
            Arc::new(InMemoryTeamRepository::new());
        let fixture_repository: Arc<dyn FixtureRepository + Send + Sync> =
            Arc::new(InMemoryFixtureRepository::new());

        let state = AppState::new(
            player_repository.clone(),
            team_repository.clone(),
            fixture_repository.clone(),
        );

        let team = TeamService::new(team_repository.clone())
            .add_team(AddTeamRequest {
                name: self.team_name.clone(),
                coach: "Coach Random".to_string(),
                founded: 2024,
            })
            .await
            .unwrap();

        let player_service = PlayerService::new(player_repository.clone(), team_repository);
        let mut players = Vec::new();
        for name in &self.player_names {
            let player = player_service
                .add_player(NewPlayer {
                    name: name.clone(),
                    age: 21,
                    position: "CM".to_string(),
                    fun_fact: String::new(),
                    team_id: team.id,
                })
                .await
                .unwrap();
            players.push(player);
        }

        let fixture_service = FixtureService::new(fixture_repository, player_repository);
        let mut fixtures = Vec::new();
        for i in 0..self.fixture_count {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::weeks(i as i64);
            let (fixture, _) = fixture_service
                .add_fixture(AddFixtureRequest {
                    date: date.format("%Y-%m-%d").to_string(),
                    home_team: self.team_name.clone(),
                    away_team: format!("Opponent {}", i + 1),
                    home_score: String::new(),
                    away_score: String::new(),
                    man_of_the_match: None,
                    latitude: None,
                    longitude: None,
                })
                .await
                .unwrap();
            fixtures.push(fixture);
        }

        let app = create_router(state.clone(), &AppConfig::default());

        TestSetup {
            state,
            app,
            team,
            players,
            fixtures,
        }
    }
}
