use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::info;
use pelada_core::{SquadPlayer, TeamSheets, generate_balanced_division};

use crate::{
    ServiceError, ServiceResult,
    feed::{SnapshotHub, Subscription},
    matches::MatchId,
    player::{ArcPlayerDirectory, PlayerId},
    roster::ArcRosterService,
};

/// The single persisted division of one match.
#[derive(Clone, Debug, PartialEq)]
pub struct TeamDivision {
    pub match_id: MatchId,
    pub created_by: PlayerId,
    pub team_black: Vec<PlayerId>,
    pub team_white: Vec<PlayerId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub active: bool,
}

pub type ArcDivisionRepository = Arc<Box<dyn DivisionRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait DivisionRepository {
    async fn get_division(&self, match_id: &MatchId) -> ServiceResult<Option<TeamDivision>>;
    async fn insert_division(&self, division: &TeamDivision) -> ServiceResult<()>;
    async fn update_division(&self, division: &TeamDivision) -> ServiceResult<()>;
    async fn delete_division(&self, match_id: &MatchId) -> ServiceResult<()>;
}

pub type ArcDivisionService = Arc<Box<dyn DivisionService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait DivisionService {
    /// Proposes balanced sheets for the match's confirmed players. Nothing
    /// is persisted; every call draws a fresh seed.
    async fn generate(&self, match_id: &MatchId) -> ServiceResult<TeamSheets>;
    async fn create_or_update(
        &self,
        match_id: &MatchId,
        requester_id: &PlayerId,
        sheets: TeamSheets,
    ) -> ServiceResult<TeamDivision>;
    async fn get_division(&self, match_id: &MatchId) -> ServiceResult<Option<TeamDivision>>;
    async fn delete(&self, match_id: &MatchId, requester_id: &PlayerId) -> ServiceResult<()>;
    async fn observe(
        &self,
        match_id: &MatchId,
    ) -> ServiceResult<Subscription<Option<TeamDivision>>>;
}

pub struct DivisionServiceImpl {
    roster_service: ArcRosterService,
    player_directory: ArcPlayerDirectory,
    division_repository: ArcDivisionRepository,
    feed: SnapshotHub<Option<TeamDivision>>,
    next_seed: Arc<std::sync::Mutex<u32>>,
}

impl DivisionServiceImpl {
    pub fn new(
        roster_service: ArcRosterService,
        player_directory: ArcPlayerDirectory,
        division_repository: ArcDivisionRepository,
    ) -> Self {
        Self {
            roster_service,
            player_directory,
            division_repository,
            feed: SnapshotHub::new(),
            next_seed: Arc::new(std::sync::Mutex::new(1)),
        }
    }

    fn increment_seed(&self) -> u32 {
        let mut seed_lock = self.next_seed.lock().expect("Failed to lock seed mutex");
        let seed = *seed_lock;
        *seed_lock += 1;
        seed
    }
}

#[async_trait::async_trait]
impl DivisionService for DivisionServiceImpl {
    async fn generate(&self, match_id: &MatchId) -> ServiceResult<TeamSheets> {
        let list = self.roster_service.get_list(match_id).await?;
        let squad: Vec<SquadPlayer> = list
            .confirmed()
            .iter()
            .map(|resolved| resolved.player.squad_player())
            .collect();
        let seed = self.increment_seed();
        let sheets = generate_balanced_division(&squad, seed);
        info!(
            "Proposed division for match [{}] with seed {}: {} vs {}",
            match_id,
            seed,
            sheets.team_black.len(),
            sheets.team_white.len()
        );
        Ok(sheets)
    }

    async fn create_or_update(
        &self,
        match_id: &MatchId,
        requester_id: &PlayerId,
        sheets: TeamSheets,
    ) -> ServiceResult<TeamDivision> {
        if sheets.team_black.is_empty() || sheets.team_white.is_empty() {
            return ServiceError::invalid_division("empty team");
        }
        let list = self.roster_service.get_list(match_id).await?;
        let sheet_count = sheets.team_black.len() + sheets.team_white.len();
        if sheet_count != list.confirmed_count() {
            return ServiceError::invalid_division(format!(
                "player count mismatch: sheets hold {}, match [{}] has {} confirmed",
                sheet_count,
                match_id,
                list.confirmed_count()
            ));
        }
        let requester = self.player_directory.require_player(requester_id).await?;

        let division = match self.division_repository.get_division(match_id).await? {
            Some(mut division) => {
                if division.created_by != requester.id && !requester.is_admin() {
                    return ServiceError::forbidden(format!(
                        "player [{}] may not edit the division of match [{}]",
                        requester_id, match_id
                    ));
                }
                division.team_black = sheets.team_black;
                division.team_white = sheets.team_white;
                // attribution moves to whoever edited last
                division.created_by = requester.id.clone();
                division.updated_at = Utc::now();
                self.division_repository.update_division(&division).await?;
                info!("Player [{}] updated the division of match [{}]", requester_id, match_id);
                division
            }
            None => {
                let now = Utc::now();
                let division = TeamDivision {
                    match_id: match_id.clone(),
                    created_by: requester.id.clone(),
                    team_black: sheets.team_black,
                    team_white: sheets.team_white,
                    created_at: now,
                    updated_at: now,
                    active: true,
                };
                self.division_repository.insert_division(&division).await?;
                info!("Player [{}] created the division of match [{}]", requester_id, match_id);
                division
            }
        };

        self.feed.publish(match_id, Some(division.clone()));
        Ok(division)
    }

    async fn get_division(&self, match_id: &MatchId) -> ServiceResult<Option<TeamDivision>> {
        self.division_repository.get_division(match_id).await
    }

    async fn delete(&self, match_id: &MatchId, requester_id: &PlayerId) -> ServiceResult<()> {
        let Some(division) = self.division_repository.get_division(match_id).await? else {
            return ServiceError::not_found(format!("no division for match [{}]", match_id));
        };
        let requester = self.player_directory.require_player(requester_id).await?;
        if division.created_by != requester.id && !requester.is_admin() {
            return ServiceError::forbidden(format!(
                "player [{}] may not delete the division of match [{}]",
                requester_id, match_id
            ));
        }
        self.division_repository.delete_division(match_id).await?;
        self.feed.publish(match_id, None);
        info!("Player [{}] deleted the division of match [{}]", requester_id, match_id);
        Ok(())
    }

    async fn observe(
        &self,
        match_id: &MatchId,
    ) -> ServiceResult<Subscription<Option<TeamDivision>>> {
        let current = self.division_repository.get_division(match_id).await?;
        Ok(self.feed.subscribe(match_id, current))
    }
}

#[derive(Clone, Default)]
pub struct MockDivisionRepository {
    divisions: Arc<DashMap<MatchId, TeamDivision>>,
}

#[async_trait::async_trait]
impl DivisionRepository for MockDivisionRepository {
    async fn get_division(&self, match_id: &MatchId) -> ServiceResult<Option<TeamDivision>> {
        Ok(self.divisions.get(match_id).map(|entry| entry.value().clone()))
    }

    async fn insert_division(&self, division: &TeamDivision) -> ServiceResult<()> {
        if self.divisions.contains_key(&division.match_id) {
            return ServiceError::storage(format!(
                "division for match [{}] already exists",
                division.match_id
            ));
        }
        self.divisions
            .insert(division.match_id.clone(), division.clone());
        Ok(())
    }

    async fn update_division(&self, division: &TeamDivision) -> ServiceResult<()> {
        if !self.divisions.contains_key(&division.match_id) {
            return ServiceError::storage(format!(
                "no division for match [{}]",
                division.match_id
            ));
        }
        self.divisions
            .insert(division.match_id.clone(), division.clone());
        Ok(())
    }

    async fn delete_division(&self, match_id: &MatchId) -> ServiceResult<()> {
        self.divisions.remove(match_id);
        Ok(())
    }
}
