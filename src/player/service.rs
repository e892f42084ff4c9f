use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::{
    models::{NewPlayer, Player, PlayerUpdate, RosterEntry},
    repository::PlayerRepository,
};
use crate::shared::{AppError, EntityId};
use crate::team::repository::TeamRepository;

/// Service for handling player business logic
pub struct PlayerService {
    players: Arc<dyn PlayerRepository + Send + Sync>,
    teams: Arc<dyn TeamRepository + Send + Sync>,
}

impl PlayerService {
    pub fn new(
        players: Arc<dyn PlayerRepository + Send + Sync>,
        teams: Arc<dyn TeamRepository + Send + Sync>,
    ) -> Self {
        Self { players, teams }
    }

    /// Creates a player on an existing team and appends it to the team's
    /// member list. An unknown team fails before anything is written.
    #[instrument(skip(self))]
    pub async fn add_player(&self, new_player: NewPlayer) -> Result<Player, AppError> {
        let name = new_player.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Player name is required".to_string()));
        }

        if self.teams.get_team(&new_player.team_id).await?.is_none() {
            warn!(team_id = %new_player.team_id, "Refusing to add player to unknown team");
            return Err(AppError::InvalidTeamId(new_player.team_id.to_string()));
        }

        let player = Player::new(
            name.to_string(),
            new_player.age,
            new_player.position,
            new_player.fun_fact,
            new_player.team_id,
        );
        self.players.create_player(&player).await?;

        // Membership is a soft reference; the player record stands even if this fails
        self.teams
            .add_member(&player.team_id, &player.id)
            .await
            .inspect_err(|e| {
                warn!(player_id = %player.id, team_id = %player.team_id, error = %e, "Player created but team membership not recorded");
            })?;

        info!(player_id = %player.id, team_id = %player.team_id, name = %player.name, "Player created successfully");
        Ok(player)
    }

    /// Resolves the team by name, then behaves like `add_player`
    #[instrument(skip(self))]
    pub async fn add_player_to_named_team(
        &self,
        team_name: &str,
        name: String,
        age: u32,
        position: String,
        fun_fact: String,
    ) -> Result<Player, AppError> {
        let team = self
            .teams
            .get_team_by_name(team_name)
            .await?
            .ok_or_else(|| AppError::InvalidTeamId(format!("no team named {:?}", team_name)))?;

        self.add_player(NewPlayer {
            name,
            age,
            position,
            fun_fact,
            team_id: team.id,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_player(&self, player_id: &str) -> Result<Player, AppError> {
        let player_id = EntityId::parse(player_id)?;
        self.players
            .get_player(&player_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Player {} not found", player_id)))
    }

    /// Applies typed field updates to one player
    #[instrument(skip(self))]
    pub async fn update_player(
        &self,
        player_id: &str,
        updates: Vec<PlayerUpdate>,
    ) -> Result<Player, AppError> {
        let player_id = EntityId::parse(player_id)?;
        if updates.is_empty() {
            return Err(AppError::Validation("No fields to update".to_string()));
        }

        let player = self.players.update_player(&player_id, &updates).await?;
        info!(player_id = %player_id, field_count = updates.len(), "Player updated successfully");
        Ok(player)
    }

    /// Deletes a player after checking it exists, so a missing player is
    /// reported as `NotFound` rather than as a store failure. Team member
    /// lists and fixture event logs keep their references.
    #[instrument(skip(self))]
    pub async fn delete_player(&self, player_id: &str) -> Result<EntityId, AppError> {
        let player_id = EntityId::parse(player_id)?;

        if self.players.get_player(&player_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Player {} not found", player_id)));
        }
        self.players.delete_player(&player_id).await?;

        info!(player_id = %player_id, "Player deleted successfully");
        Ok(player_id)
    }

    /// Active players joined to their team's name
    #[instrument(skip(self))]
    pub async fn active_roster(&self) -> Result<Vec<RosterEntry>, AppError> {
        let (players, teams) =
            futures::try_join!(self.players.list_players(), self.teams.list_teams())?;

        let team_names: HashMap<EntityId, String> =
            teams.into_iter().map(|t| (t.id, t.name)).collect();

        let roster: Vec<RosterEntry> = players
            .into_iter()
            .filter(|p| p.active)
            .map(|player| {
                let team_name = team_names.get(&player.team_id).cloned();
                RosterEntry { player, team_name }
            })
            .collect();

        debug!(player_count = roster.len(), "Active roster built");
        Ok(roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::repository::InMemoryPlayerRepository;
    use crate::team::models::Team;
    use crate::team::repository::InMemoryTeamRepository;

    struct Setup {
        service: PlayerService,
        players: Arc<InMemoryPlayerRepository>,
        teams: Arc<InMemoryTeamRepository>,
    }

    fn setup() -> Setup {
        let players = Arc::new(InMemoryPlayerRepository::new());
        let teams = Arc::new(InMemoryTeamRepository::new());
        Setup {
            service: PlayerService::new(players.clone(), teams.clone()),
            players,
            teams,
        }
    }

    async fn add_team(setup: &Setup, name: &str) -> Team {
        let team = Team::new(name.to_string(), "Coach".to_string(), 2000);
        setup.teams.create_team(&team).await.unwrap();
        team
    }

    fn new_player(name: &str, team_id: EntityId) -> NewPlayer {
        NewPlayer {
            name: name.to_string(),
            age: 20,
            position: "GK".to_string(),
            fun_fact: "Never late".to_string(),
            team_id,
        }
    }

    #[tokio::test]
    async fn test_add_player_joins_team() {
        let setup = setup();
        let team = add_team(&setup, "Seeded FC").await;

        let player = setup
            .service
            .add_player(new_player("Drew", team.id))
            .await
            .unwrap();

        assert!(player.active);
        let stored_team = setup.teams.get_team(&team.id).await.unwrap().unwrap();
        assert_eq!(stored_team.players, vec![player.id]);
    }

    #[tokio::test]
    async fn test_add_player_to_unknown_team_creates_nothing() {
        let setup = setup();

        let by_id = setup
            .service
            .add_player(new_player("Drew", EntityId::new()))
            .await;
        assert!(matches!(by_id, Err(AppError::InvalidTeamId(_))));

        let by_name = setup
            .service
            .add_player_to_named_team(
                "Nobody FC",
                "Drew".to_string(),
                20,
                "GK".to_string(),
                String::new(),
            )
            .await;
        assert!(matches!(by_name, Err(AppError::InvalidTeamId(_))));

        assert_eq!(setup.players.player_count().await, 0);
    }

    #[tokio::test]
    async fn test_update_player_error_kinds() {
        let setup = setup();

        let malformed = setup
            .service
            .update_player("nope", vec![PlayerUpdate::Age(30)])
            .await;
        assert!(matches!(malformed, Err(AppError::InvalidId(_))));

        let empty = setup
            .service
            .update_player(&EntityId::new().to_string(), vec![])
            .await;
        assert!(matches!(empty, Err(AppError::Validation(_))));

        let missing = setup
            .service
            .update_player(&EntityId::new().to_string(), vec![PlayerUpdate::Age(30)])
            .await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_unknown_player_is_not_found() {
        let setup = setup();

        let result = setup
            .service
            .delete_player(&EntityId::new().to_string())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let malformed = setup.service.delete_player("123").await;
        assert!(matches!(malformed, Err(AppError::InvalidId(_))));
    }

    #[tokio::test]
    async fn test_delete_player_keeps_team_membership() {
        let setup = setup();
        let team = add_team(&setup, "Seeded FC").await;
        let player = setup
            .service
            .add_player(new_player("Drew", team.id))
            .await
            .unwrap();

        setup
            .service
            .delete_player(&player.id.to_string())
            .await
            .unwrap();

        let stored_team = setup.teams.get_team(&team.id).await.unwrap().unwrap();
        assert!(stored_team.has_player(&player.id));
        let lookup = setup.service.get_player(&player.id.to_string()).await;
        assert!(matches!(lookup, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_active_roster_filters_and_joins_team_name() {
        let setup = setup();
        let team = add_team(&setup, "Seeded FC").await;
        let active = setup
            .service
            .add_player(new_player("Alex", team.id))
            .await
            .unwrap();
        let benched = setup
            .service
            .add_player(new_player("Sam", team.id))
            .await
            .unwrap();
        setup
            .service
            .update_player(&benched.id.to_string(), vec![PlayerUpdate::Active(false)])
            .await
            .unwrap();

        // A player whose team reference dangles is listed without a team name
        let orphan = Player::new(
            "Riley".to_string(),
            19,
            "LB".to_string(),
            String::new(),
            EntityId::new(),
        );
        setup.players.create_player(&orphan).await.unwrap();

        let roster = setup.service.active_roster().await.unwrap();

        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].player.id, active.id);
        assert_eq!(roster[0].team_name.as_deref(), Some("Seeded FC"));
        assert_eq!(roster[1].player.id, orphan.id);
        assert!(roster[1].team_name.is_none());
    }
}
