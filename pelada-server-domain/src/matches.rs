use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::{ServiceError, ServiceResult};

pub type MatchId = String;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchStatus {
    Scheduled,
    Closed,
    Finished,
}

impl MatchStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Closed => "closed",
            MatchStatus::Finished => "finished",
        }
    }

    pub fn parse(label: &str) -> Option<MatchStatus> {
        match label {
            "scheduled" => Some(MatchStatus::Scheduled),
            "closed" => Some(MatchStatus::Closed),
            "finished" => Some(MatchStatus::Finished),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Match {
    pub id: MatchId,
    pub location: String,
    pub scheduled_at: DateTime<Utc>,
    pub max_players: u32,
    pub player_count: u32,
    pub status: MatchStatus,
}

impl Match {
    /// Only scheduled matches take new attendance entries.
    pub fn accepts_joins(&self) -> bool {
        self.status == MatchStatus::Scheduled
    }
}

pub type ArcMatchRepository = Arc<Box<dyn MatchRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait MatchRepository {
    async fn get_match_by_id(&self, id: &MatchId) -> ServiceResult<Option<Match>>;
    async fn get_matches(&self) -> ServiceResult<Vec<Match>>;
    async fn create_match(&self, match_record: &Match) -> ServiceResult<()>;
    async fn update_player_count(&self, id: &MatchId, player_count: u32) -> ServiceResult<()>;
}

#[derive(Clone, Default)]
pub struct MockMatchRepository {
    matches: Arc<DashMap<MatchId, Match>>,
}

impl MockMatchRepository {
    pub fn with_matches(matches: Vec<Match>) -> Self {
        let repository = Self::default();
        for match_record in matches {
            repository
                .matches
                .insert(match_record.id.clone(), match_record);
        }
        repository
    }
}

#[async_trait::async_trait]
impl MatchRepository for MockMatchRepository {
    async fn get_match_by_id(&self, id: &MatchId) -> ServiceResult<Option<Match>> {
        Ok(self.matches.get(id).map(|entry| entry.value().clone()))
    }

    async fn get_matches(&self) -> ServiceResult<Vec<Match>> {
        let mut matches: Vec<Match> = self
            .matches
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        matches.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at));
        Ok(matches)
    }

    async fn create_match(&self, match_record: &Match) -> ServiceResult<()> {
        if self.matches.contains_key(&match_record.id) {
            return ServiceError::storage(format!("match id [{}] already taken", match_record.id));
        }
        self.matches
            .insert(match_record.id.clone(), match_record.clone());
        Ok(())
    }

    async fn update_player_count(&self, id: &MatchId, player_count: u32) -> ServiceResult<()> {
        let Some(mut match_record) = self.matches.get_mut(id) else {
            return ServiceError::storage(format!("no match with id [{}]", id));
        };
        match_record.player_count = player_count;
        Ok(())
    }
}
