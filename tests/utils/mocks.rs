use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fctracker::{
    player::{
        models::{Player, PlayerUpdate},
        repository::{InMemoryPlayerRepository, PlayerRepository},
    },
    AppError, EntityId,
};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Player store whose writes can be switched to fail, for exercising
/// partial failures of multi-step operations
#[derive(Clone)]
pub struct FlakyPlayerRepository {
    inner: Arc<InMemoryPlayerRepository>,
    fail_updates: Arc<AtomicBool>,
}

impl FlakyPlayerRepository {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(InMemoryPlayerRepository::new()),
            fail_updates: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PlayerRepository for FlakyPlayerRepository {
    async fn create_player(&self, player: &Player) -> Result<(), AppError> {
        self.inner.create_player(player).await
    }

    async fn get_player(&self, player_id: &EntityId) -> Result<Option<Player>, AppError> {
        self.inner.get_player(player_id).await
    }

    async fn list_players(&self) -> Result<Vec<Player>, AppError> {
        self.inner.list_players().await
    }

    async fn update_player(
        &self,
        player_id: &EntityId,
        updates: &[PlayerUpdate],
    ) -> Result<Player, AppError> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError("injected update failure".to_string()));
        }
        self.inner.update_player(player_id, updates).await
    }

    async fn delete_player(&self, player_id: &EntityId) -> Result<(), AppError> {
        self.inner.delete_player(player_id).await
    }
}
