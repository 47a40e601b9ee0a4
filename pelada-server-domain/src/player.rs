use std::sync::Arc;

use dashmap::DashMap;
use log::info;
use pelada_core::{FieldPosition, SquadPlayer};

use crate::{ServiceError, ServiceResult};

pub type PlayerId = pelada_core::PlayerId;

pub const DEFAULT_SCORE: u32 = 100;
pub const MAX_SCORE: u32 = 1000;

/// One directory record. Read-only input to the roster and the balancer.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
    pub positions: Vec<FieldPosition>,
    pub monthly_payer: bool,
    pub admin: bool,
    pub active: bool,
}

impl Player {
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn is_monthly_payer(&self) -> bool {
        self.monthly_payer
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Balancing view of this record.
    pub fn squad_player(&self) -> SquadPlayer {
        SquadPlayer {
            id: self.id.clone(),
            score: self.score,
            positions: self.positions.clone(),
        }
    }
}

pub type ArcPlayerRepository = Arc<Box<dyn PlayerRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait PlayerRepository {
    async fn get_player_by_id(&self, id: &PlayerId) -> ServiceResult<Option<Player>>;
    async fn get_players(&self) -> ServiceResult<Vec<Player>>;
    async fn create_player(&self, player: &Player) -> ServiceResult<()>;
}

pub type ArcPlayerDirectory = Arc<Box<dyn PlayerDirectory + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait PlayerDirectory {
    async fn find_player(&self, id: &PlayerId) -> ServiceResult<Option<Player>>;
    async fn require_player(&self, id: &PlayerId) -> ServiceResult<Player>;
    async fn get_players(&self) -> ServiceResult<Vec<Player>>;
    async fn add_player(&self, player: Player) -> ServiceResult<()>;
}

pub struct PlayerDirectoryImpl {
    player_repository: ArcPlayerRepository,
    player_cache: Arc<moka::sync::Cache<PlayerId, Player>>,
}

impl PlayerDirectoryImpl {
    pub fn new(player_repository: ArcPlayerRepository) -> Self {
        Self {
            player_repository,
            player_cache: Arc::new(moka::sync::Cache::builder().max_capacity(1000).build()),
        }
    }
}

#[async_trait::async_trait]
impl PlayerDirectory for PlayerDirectoryImpl {
    async fn find_player(&self, id: &PlayerId) -> ServiceResult<Option<Player>> {
        if let Some(player) = self.player_cache.get(id) {
            return Ok(Some(player));
        }
        let player = self.player_repository.get_player_by_id(id).await?;
        if let Some(player) = &player {
            self.player_cache.insert(id.clone(), player.clone());
        }
        Ok(player)
    }

    async fn require_player(&self, id: &PlayerId) -> ServiceResult<Player> {
        match self.find_player(id).await? {
            Some(player) => Ok(player),
            None => ServiceError::player_not_found(format!("no player with id [{}]", id)),
        }
    }

    async fn get_players(&self) -> ServiceResult<Vec<Player>> {
        self.player_repository.get_players().await
    }

    async fn add_player(&self, player: Player) -> ServiceResult<()> {
        let mut player = player;
        // directory scores live in 0..=MAX_SCORE
        player.score = player.score.min(MAX_SCORE);
        self.player_repository.create_player(&player).await?;
        self.player_cache.invalidate(&player.id);
        info!("Added player [{}] to the directory", player.id);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockPlayerRepository {
    players: Arc<DashMap<PlayerId, Player>>,
}

impl MockPlayerRepository {
    pub fn with_players(players: Vec<Player>) -> Self {
        let repository = Self::default();
        for player in players {
            repository.players.insert(player.id.clone(), player);
        }
        repository
    }

    pub fn remove(&self, id: &PlayerId) {
        self.players.remove(id);
    }
}

#[async_trait::async_trait]
impl PlayerRepository for MockPlayerRepository {
    async fn get_player_by_id(&self, id: &PlayerId) -> ServiceResult<Option<Player>> {
        Ok(self.players.get(id).map(|entry| entry.value().clone()))
    }

    async fn get_players(&self) -> ServiceResult<Vec<Player>> {
        let mut players: Vec<Player> = self
            .players
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        players.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(players)
    }

    async fn create_player(&self, player: &Player) -> ServiceResult<()> {
        if self.players.contains_key(&player.id) {
            return ServiceError::storage(format!("player id [{}] already taken", player.id));
        }
        self.players.insert(player.id.clone(), player.clone());
        Ok(())
    }
}
