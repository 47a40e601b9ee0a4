use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::info;

use crate::{
    ServiceError, ServiceResult,
    feed::{SnapshotHub, Subscription},
    matches::{ArcMatchRepository, Match, MatchId},
    player::{ArcPlayerDirectory, Player, PlayerId},
};

/// One stored attendance entry. Immutable after creation except for position
/// renumbering.
#[derive(Clone, Debug, PartialEq)]
pub struct AttendanceEntry {
    pub match_id: MatchId,
    pub player_id: PlayerId,
    pub position: u32,
    pub joined_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttendanceStatus {
    Confirmed,
    Waiting,
}

/// One roster line: the stored entry resolved against the directory.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedEntry {
    pub entry: AttendanceEntry,
    pub player: Player,
    pub status: AttendanceStatus,
}

/// Fully resolved, fully sorted view of one match's roster.
#[derive(Clone, Debug, PartialEq)]
pub struct AttendanceList {
    pub match_id: MatchId,
    pub max_players: u32,
    pub entries: Vec<ResolvedEntry>,
}

impl AttendanceList {
    fn from_sorted(
        match_id: MatchId,
        max_players: u32,
        pairs: Vec<(AttendanceEntry, Player)>,
    ) -> Self {
        let confirmed = pelada_core::confirmed_count(pairs.len(), max_players);
        let entries = pairs
            .into_iter()
            .enumerate()
            .map(|(index, (entry, player))| ResolvedEntry {
                entry,
                player,
                status: if index < confirmed {
                    AttendanceStatus::Confirmed
                } else {
                    AttendanceStatus::Waiting
                },
            })
            .collect();
        Self {
            match_id,
            max_players,
            entries,
        }
    }

    /// Prefix of entries that fit the match capacity.
    pub fn confirmed(&self) -> &[ResolvedEntry] {
        &self.entries[..self.confirmed_count()]
    }

    /// Suffix past capacity, in waitlist order.
    pub fn waiting(&self) -> &[ResolvedEntry] {
        &self.entries[self.confirmed_count()..]
    }

    pub fn confirmed_count(&self) -> usize {
        pelada_core::confirmed_count(self.entries.len(), self.max_players)
    }

    pub fn waiting_count(&self) -> usize {
        pelada_core::waiting_count(self.entries.len(), self.max_players)
    }

    pub fn is_full(&self) -> bool {
        pelada_core::is_full(self.entries.len(), self.max_players)
    }

    pub fn can_join(&self, player_id: &PlayerId) -> bool {
        !self.is_full() && !self.has_entry(player_id)
    }

    pub fn can_leave(&self, player_id: &PlayerId) -> bool {
        self.has_entry(player_id)
    }

    fn has_entry(&self, player_id: &PlayerId) -> bool {
        self.entries
            .iter()
            .any(|resolved| &resolved.entry.player_id == player_id)
    }
}

pub type ArcAttendanceRepository = Arc<Box<dyn AttendanceRepository + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait AttendanceRepository {
    /// All entries of a match, ordered by stored position.
    async fn get_entries(&self, match_id: &MatchId) -> ServiceResult<Vec<AttendanceEntry>>;
    async fn get_entry(
        &self,
        match_id: &MatchId,
        player_id: &PlayerId,
    ) -> ServiceResult<Option<AttendanceEntry>>;
    async fn create_entry(&self, entry: &AttendanceEntry) -> ServiceResult<()>;
    async fn delete_entry(&self, match_id: &MatchId, player_id: &PlayerId) -> ServiceResult<()>;
    async fn update_positions(
        &self,
        match_id: &MatchId,
        positions: &[(PlayerId, u32)],
    ) -> ServiceResult<()>;
}

pub type ArcRosterService = Arc<Box<dyn RosterService + Send + Sync + 'static>>;

#[async_trait::async_trait]
pub trait RosterService {
    async fn join(&self, match_id: &MatchId, player_id: &PlayerId)
    -> ServiceResult<AttendanceEntry>;
    async fn leave(&self, match_id: &MatchId, player_id: &PlayerId) -> ServiceResult<()>;
    async fn remove_player(
        &self,
        match_id: &MatchId,
        requester_id: &PlayerId,
        player_id: &PlayerId,
    ) -> ServiceResult<()>;
    async fn get_list(&self, match_id: &MatchId) -> ServiceResult<AttendanceList>;
    async fn observe(&self, match_id: &MatchId) -> ServiceResult<Subscription<AttendanceList>>;
}

pub struct RosterServiceImpl {
    player_directory: ArcPlayerDirectory,
    match_repository: ArcMatchRepository,
    attendance_repository: ArcAttendanceRepository,
    match_locks: DashMap<MatchId, Arc<tokio::sync::Mutex<()>>>,
    feed: SnapshotHub<AttendanceList>,
}

impl RosterServiceImpl {
    pub fn new(
        player_directory: ArcPlayerDirectory,
        match_repository: ArcMatchRepository,
        attendance_repository: ArcAttendanceRepository,
    ) -> Self {
        Self {
            player_directory,
            match_repository,
            attendance_repository,
            match_locks: DashMap::new(),
            feed: SnapshotHub::new(),
        }
    }

    /// Mutations of one match never interleave, so the renumbering pass
    /// always sees a settled entry set.
    fn lock_for(&self, match_id: &MatchId) -> Arc<tokio::sync::Mutex<()>> {
        self.match_locks
            .entry(match_id.clone())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    async fn require_match(&self, match_id: &MatchId) -> ServiceResult<Match> {
        match self.match_repository.get_match_by_id(match_id).await? {
            Some(match_record) => Ok(match_record),
            None => ServiceError::not_found(format!("no match with id [{}]", match_id)),
        }
    }

    async fn resolve_entries(
        &self,
        entries: Vec<AttendanceEntry>,
    ) -> ServiceResult<Vec<(AttendanceEntry, Player)>> {
        let lookups = entries
            .iter()
            .map(|entry| self.player_directory.require_player(&entry.player_id));
        let players = futures::future::try_join_all(lookups).await?;
        Ok(entries.into_iter().zip(players).collect())
    }

    fn rank_inputs(pairs: &[(AttendanceEntry, Player)]) -> Vec<pelada_core::RosterEntry> {
        pairs
            .iter()
            .map(|(entry, player)| pelada_core::RosterEntry {
                player_id: entry.player_id.clone(),
                monthly_payer: player.monthly_payer,
                joined_at: entry.joined_at,
            })
            .collect()
    }

    /// Sorts the entries into priority order, persists every position that
    /// moved, refreshes the match counter and publishes the new snapshot.
    async fn finish_mutation(
        &self,
        match_record: &Match,
        mut pairs: Vec<(AttendanceEntry, Player)>,
    ) -> ServiceResult<AttendanceList> {
        pairs.sort_by(|a, b| {
            pelada_core::priority_order(
                (a.1.monthly_payer, a.0.joined_at),
                (b.1.monthly_payer, b.0.joined_at),
            )
        });

        let mut moved = Vec::new();
        for (index, (entry, _)) in pairs.iter_mut().enumerate() {
            let position = index as u32 + 1;
            if entry.position != position {
                entry.position = position;
                moved.push((entry.player_id.clone(), position));
            }
        }
        if !moved.is_empty() {
            self.attendance_repository
                .update_positions(&match_record.id, &moved)
                .await?;
        }
        self.match_repository
            .update_player_count(&match_record.id, pairs.len() as u32)
            .await?;

        let list =
            AttendanceList::from_sorted(match_record.id.clone(), match_record.max_players, pairs);
        self.feed.publish(&match_record.id, list.clone());
        Ok(list)
    }

    async fn delete_and_reorder(
        &self,
        match_id: &MatchId,
        player_id: &PlayerId,
    ) -> ServiceResult<()> {
        let lock = self.lock_for(match_id);
        let _guard = lock.lock().await;

        let match_record = self.require_match(match_id).await?;
        if self
            .attendance_repository
            .get_entry(match_id, player_id)
            .await?
            .is_none()
        {
            return ServiceError::not_in_list(format!(
                "player [{}] has no entry in match [{}]",
                player_id, match_id
            ));
        }
        self.attendance_repository
            .delete_entry(match_id, player_id)
            .await?;

        let entries = self.attendance_repository.get_entries(match_id).await?;
        let pairs = self.resolve_entries(entries).await?;
        self.finish_mutation(&match_record, pairs).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl RosterService for RosterServiceImpl {
    async fn join(
        &self,
        match_id: &MatchId,
        player_id: &PlayerId,
    ) -> ServiceResult<AttendanceEntry> {
        let lock = self.lock_for(match_id);
        let _guard = lock.lock().await;

        let match_record = self.require_match(match_id).await?;
        if !match_record.accepts_joins() {
            return ServiceError::not_found(format!(
                "match [{}] is not taking players",
                match_id
            ));
        }
        let player = self.player_directory.require_player(player_id).await?;
        if !player.is_active() {
            return ServiceError::forbidden(format!("player [{}] is inactive", player_id));
        }

        let entries = self.attendance_repository.get_entries(match_id).await?;
        if entries.iter().any(|entry| &entry.player_id == player_id) {
            return ServiceError::already_joined(format!(
                "player [{}] already joined match [{}]",
                player_id, match_id
            ));
        }

        let mut pairs = self.resolve_entries(entries).await?;
        let position = pelada_core::join_rank(&Self::rank_inputs(&pairs), player.monthly_payer);
        let entry = AttendanceEntry {
            match_id: match_id.clone(),
            player_id: player_id.clone(),
            position,
            joined_at: Utc::now(),
        };
        self.attendance_repository.create_entry(&entry).await?;
        pairs.push((entry, player));

        let list = self.finish_mutation(&match_record, pairs).await?;
        let entry = list
            .entries
            .iter()
            .find(|resolved| &resolved.entry.player_id == player_id)
            .map(|resolved| resolved.entry.clone())
            .ok_or_else(|| {
                ServiceError::Internal(format!(
                    "entry of player [{}] missing after reorder",
                    player_id
                ))
            })?;

        info!(
            "Player [{}] joined match [{}] at position {}",
            player_id, match_id, entry.position
        );
        Ok(entry)
    }

    async fn leave(&self, match_id: &MatchId, player_id: &PlayerId) -> ServiceResult<()> {
        self.delete_and_reorder(match_id, player_id).await?;
        info!("Player [{}] left match [{}]", player_id, match_id);
        Ok(())
    }

    async fn remove_player(
        &self,
        match_id: &MatchId,
        requester_id: &PlayerId,
        player_id: &PlayerId,
    ) -> ServiceResult<()> {
        let requester = self.player_directory.require_player(requester_id).await?;
        if requester_id != player_id && !requester.is_admin() {
            return ServiceError::forbidden(format!(
                "player [{}] may not remove other players",
                requester_id
            ));
        }
        self.delete_and_reorder(match_id, player_id).await?;
        info!(
            "Player [{}] removed player [{}] from match [{}]",
            requester_id, player_id, match_id
        );
        Ok(())
    }

    async fn get_list(&self, match_id: &MatchId) -> ServiceResult<AttendanceList> {
        let match_record = self.require_match(match_id).await?;
        let entries = self.attendance_repository.get_entries(match_id).await?;
        let mut pairs = self.resolve_entries(entries).await?;
        pairs.sort_by_key(|(entry, _)| entry.position);
        Ok(AttendanceList::from_sorted(
            match_id.clone(),
            match_record.max_players,
            pairs,
        ))
    }

    async fn observe(&self, match_id: &MatchId) -> ServiceResult<Subscription<AttendanceList>> {
        let list = self.get_list(match_id).await?;
        Ok(self.feed.subscribe(match_id, list))
    }
}

#[derive(Clone, Default)]
pub struct MockAttendanceRepository {
    entries: Arc<DashMap<(MatchId, PlayerId), AttendanceEntry>>,
}

#[async_trait::async_trait]
impl AttendanceRepository for MockAttendanceRepository {
    async fn get_entries(&self, match_id: &MatchId) -> ServiceResult<Vec<AttendanceEntry>> {
        let mut entries: Vec<AttendanceEntry> = self
            .entries
            .iter()
            .filter(|entry| &entry.key().0 == match_id)
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by_key(|entry| entry.position);
        Ok(entries)
    }

    async fn get_entry(
        &self,
        match_id: &MatchId,
        player_id: &PlayerId,
    ) -> ServiceResult<Option<AttendanceEntry>> {
        Ok(self
            .entries
            .get(&(match_id.clone(), player_id.clone()))
            .map(|entry| entry.value().clone()))
    }

    async fn create_entry(&self, entry: &AttendanceEntry) -> ServiceResult<()> {
        let key = (entry.match_id.clone(), entry.player_id.clone());
        if self.entries.contains_key(&key) {
            return ServiceError::storage(format!(
                "entry for player [{}] in match [{}] already exists",
                entry.player_id, entry.match_id
            ));
        }
        self.entries.insert(key, entry.clone());
        Ok(())
    }

    async fn delete_entry(&self, match_id: &MatchId, player_id: &PlayerId) -> ServiceResult<()> {
        self.entries.remove(&(match_id.clone(), player_id.clone()));
        Ok(())
    }

    async fn update_positions(
        &self,
        match_id: &MatchId,
        positions: &[(PlayerId, u32)],
    ) -> ServiceResult<()> {
        for (player_id, position) in positions {
            if let Some(mut entry) = self
                .entries
                .get_mut(&(match_id.clone(), player_id.clone()))
            {
                entry.position = *position;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pelada_core::FieldPosition;

    use crate::{
        matches::{MatchRepository, MatchStatus, MockMatchRepository},
        player::{DEFAULT_SCORE, MockPlayerRepository, PlayerDirectoryImpl},
    };

    use super::*;

    fn test_player(id: &str, monthly_payer: bool, admin: bool) -> Player {
        Player {
            id: id.to_string(),
            name: id.to_uppercase(),
            score: DEFAULT_SCORE,
            positions: vec![FieldPosition::Midfield],
            monthly_payer,
            admin,
            active: true,
        }
    }

    fn test_match(id: &str, max_players: u32) -> Match {
        Match {
            id: id.to_string(),
            location: "Campo do Parque".to_string(),
            scheduled_at: Utc::now(),
            max_players,
            player_count: 0,
            status: MatchStatus::Scheduled,
        }
    }

    fn make_service(
        players: Vec<Player>,
        matches: Vec<Match>,
    ) -> (RosterServiceImpl, MockMatchRepository, MockAttendanceRepository) {
        let mock_match_repository = MockMatchRepository::with_matches(matches);
        let mock_attendance_repository = MockAttendanceRepository::default();
        let player_directory = PlayerDirectoryImpl::new(Arc::new(Box::new(
            MockPlayerRepository::with_players(players),
        )));
        let service = RosterServiceImpl::new(
            Arc::new(Box::new(player_directory)),
            Arc::new(Box::new(mock_match_repository.clone())),
            Arc::new(Box::new(mock_attendance_repository.clone())),
        );
        (service, mock_match_repository, mock_attendance_repository)
    }

    fn positions_of(list: &AttendanceList) -> Vec<(String, u32)> {
        list.entries
            .iter()
            .map(|resolved| (resolved.entry.player_id.clone(), resolved.entry.position))
            .collect()
    }

    #[tokio::test]
    async fn test_payer_joins_ahead_of_earlier_casuals() {
        let players = vec![
            test_player("p1", false, false),
            test_player("p2", true, false),
            test_player("p3", false, false),
        ];
        let (service, _, _) = make_service(players, vec![test_match("m1", 2)]);
        let match_id = "m1".to_string();

        let entry = service
            .join(&match_id, &"p1".to_string())
            .await
            .expect("Failed to join");
        assert_eq!(entry.position, 1);

        // the payer lands ahead of the earlier casual join
        let entry = service
            .join(&match_id, &"p2".to_string())
            .await
            .expect("Failed to join");
        assert_eq!(entry.position, 1);

        let entry = service
            .join(&match_id, &"p3".to_string())
            .await
            .expect("Failed to join");
        assert_eq!(entry.position, 3);

        let list = service.get_list(&match_id).await.expect("Failed to list");
        assert_eq!(
            positions_of(&list),
            vec![
                ("p2".to_string(), 1),
                ("p1".to_string(), 2),
                ("p3".to_string(), 3),
            ]
        );

        let confirmed: Vec<&str> = list
            .confirmed()
            .iter()
            .map(|resolved| resolved.entry.player_id.as_str())
            .collect();
        let waiting: Vec<&str> = list
            .waiting()
            .iter()
            .map(|resolved| resolved.entry.player_id.as_str())
            .collect();
        assert_eq!(confirmed, vec!["p2", "p1"]);
        assert_eq!(waiting, vec!["p3"]);
        assert_eq!(list.entries[2].status, AttendanceStatus::Waiting);
    }

    #[tokio::test]
    async fn test_joining_twice_fails_and_changes_nothing() {
        let players = vec![test_player("p1", false, false)];
        let (service, mock_match_repository, _) =
            make_service(players, vec![test_match("m1", 10)]);
        let match_id = "m1".to_string();

        service
            .join(&match_id, &"p1".to_string())
            .await
            .expect("Failed to join");
        let before = service.get_list(&match_id).await.expect("Failed to list");

        let result = service.join(&match_id, &"p1".to_string()).await;
        assert!(matches!(result, Err(ServiceError::AlreadyJoined(_))));

        let after = service.get_list(&match_id).await.expect("Failed to list");
        assert_eq!(positions_of(&before), positions_of(&after));
        let match_record = mock_match_repository
            .get_match_by_id(&match_id)
            .await
            .expect("Failed to fetch match")
            .expect("Match missing");
        assert_eq!(match_record.player_count, 1);
    }

    #[tokio::test]
    async fn test_unknown_player_cannot_join() {
        let (service, _, _) = make_service(vec![], vec![test_match("m1", 10)]);
        let result = service.join(&"m1".to_string(), &"ghost".to_string()).await;
        assert!(matches!(result, Err(ServiceError::PlayerNotFound(_))));
    }

    #[tokio::test]
    async fn test_join_unknown_match_fails() {
        let players = vec![test_player("p1", false, false)];
        let (service, _, _) = make_service(players, vec![]);
        let result = service.join(&"m1".to_string(), &"p1".to_string()).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_closed_match_takes_no_joins() {
        let players = vec![test_player("p1", false, false)];
        let mut match_record = test_match("m1", 10);
        match_record.status = MatchStatus::Closed;
        let (service, _, _) = make_service(players, vec![match_record]);

        let result = service.join(&"m1".to_string(), &"p1".to_string()).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_inactive_player_cannot_join() {
        let mut player = test_player("p1", false, false);
        player.active = false;
        let (service, _, _) = make_service(vec![player], vec![test_match("m1", 10)]);

        let result = service.join(&"m1".to_string(), &"p1".to_string()).await;
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_leave_renumbers_densely() {
        let players = vec![
            test_player("p1", false, false),
            test_player("p2", false, false),
            test_player("p3", false, false),
        ];
        let (service, mock_match_repository, _) =
            make_service(players, vec![test_match("m1", 10)]);
        let match_id = "m1".to_string();

        for id in ["p1", "p2", "p3"] {
            service
                .join(&match_id, &id.to_string())
                .await
                .expect("Failed to join");
        }
        service
            .leave(&match_id, &"p2".to_string())
            .await
            .expect("Failed to leave");

        let list = service.get_list(&match_id).await.expect("Failed to list");
        assert_eq!(
            positions_of(&list),
            vec![("p1".to_string(), 1), ("p3".to_string(), 2)]
        );
        let match_record = mock_match_repository
            .get_match_by_id(&match_id)
            .await
            .expect("Failed to fetch match")
            .expect("Match missing");
        assert_eq!(match_record.player_count, 2);
    }

    #[tokio::test]
    async fn test_leave_without_entry_fails() {
        let players = vec![test_player("p1", false, false)];
        let (service, _, _) = make_service(players, vec![test_match("m1", 10)]);
        let result = service.leave(&"m1".to_string(), &"p1".to_string()).await;
        assert!(matches!(result, Err(ServiceError::NotInList(_))));
    }

    #[tokio::test]
    async fn test_remove_requires_admin_or_self() {
        let players = vec![
            test_player("p1", false, false),
            test_player("p2", false, false),
            test_player("boss", false, true),
        ];
        let (service, _, _) = make_service(players, vec![test_match("m1", 10)]);
        let match_id = "m1".to_string();

        for id in ["p1", "p2"] {
            service
                .join(&match_id, &id.to_string())
                .await
                .expect("Failed to join");
        }

        let result = service
            .remove_player(&match_id, &"p1".to_string(), &"p2".to_string())
            .await;
        assert!(matches!(result, Err(ServiceError::Forbidden(_))));

        // self removal works without admin rights
        service
            .remove_player(&match_id, &"p1".to_string(), &"p1".to_string())
            .await
            .expect("Failed to remove self");

        service
            .remove_player(&match_id, &"boss".to_string(), &"p2".to_string())
            .await
            .expect("Failed to remove as admin");

        let list = service.get_list(&match_id).await.expect("Failed to list");
        assert!(list.entries.is_empty());
    }

    #[tokio::test]
    async fn test_positions_stay_dense_through_churn() {
        let players = vec![
            test_player("p1", false, false),
            test_player("p2", true, false),
            test_player("p3", false, false),
            test_player("p4", true, false),
            test_player("p5", false, false),
        ];
        let (service, _, _) = make_service(players, vec![test_match("m1", 4)]);
        let match_id = "m1".to_string();

        for id in ["p1", "p2", "p3", "p4", "p5"] {
            service
                .join(&match_id, &id.to_string())
                .await
                .expect("Failed to join");
        }
        service
            .leave(&match_id, &"p2".to_string())
            .await
            .expect("Failed to leave");
        service
            .leave(&match_id, &"p5".to_string())
            .await
            .expect("Failed to leave");

        let list = service.get_list(&match_id).await.expect("Failed to list");
        let positions: Vec<u32> = list
            .entries
            .iter()
            .map(|resolved| resolved.entry.position)
            .collect();
        assert_eq!(positions, vec![1, 2, 3]);

        // payers still ahead of every casual entry
        let payer_flags: Vec<bool> = list
            .entries
            .iter()
            .map(|resolved| resolved.player.monthly_payer)
            .collect();
        assert_eq!(payer_flags, vec![true, false, false]);
    }

    #[tokio::test]
    async fn test_waitlist_cap_blocks_can_join() {
        let players: Vec<Player> = (1..=6)
            .map(|i| test_player(&format!("p{}", i), false, false))
            .collect();
        let (service, _, _) = make_service(players, vec![test_match("m1", 1)]);
        let match_id = "m1".to_string();

        for i in 1..=5 {
            service
                .join(&match_id, &format!("p{}", i))
                .await
                .expect("Failed to join");
        }

        let list = service.get_list(&match_id).await.expect("Failed to list");
        assert!(list.is_full());
        assert_eq!(list.confirmed_count(), 1);
        assert_eq!(list.waiting_count(), 4);
        assert!(!list.can_join(&"p6".to_string()));
        assert!(list.can_leave(&"p3".to_string()));
        assert!(!list.can_leave(&"p6".to_string()));
    }

    #[tokio::test]
    async fn test_observe_publishes_on_every_change() {
        let players = vec![
            test_player("p1", false, false),
            test_player("p2", true, false),
        ];
        let (service, _, _) = make_service(players, vec![test_match("m1", 10)]);
        let match_id = "m1".to_string();

        let mut subscription = service.observe(&match_id).await.expect("Failed to observe");
        let initial = subscription.next().await.expect("Feed closed");
        assert!(initial.entries.is_empty());

        service
            .join(&match_id, &"p1".to_string())
            .await
            .expect("Failed to join");
        let snapshot = subscription.next().await.expect("Feed closed");
        assert_eq!(positions_of(&snapshot), vec![("p1".to_string(), 1)]);

        service
            .join(&match_id, &"p2".to_string())
            .await
            .expect("Failed to join");
        let snapshot = subscription.next().await.expect("Feed closed");
        assert_eq!(
            positions_of(&snapshot),
            vec![("p2".to_string(), 1), ("p1".to_string(), 2)]
        );

        service
            .leave(&match_id, &"p2".to_string())
            .await
            .expect("Failed to leave");
        let snapshot = subscription.next().await.expect("Feed closed");
        assert_eq!(positions_of(&snapshot), vec![("p1".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_dropped_subscription_detaches() {
        let players = vec![test_player("p1", false, false)];
        let (service, _, _) = make_service(players, vec![test_match("m1", 10)]);
        let match_id = "m1".to_string();

        let subscription = service.observe(&match_id).await.expect("Failed to observe");
        drop(subscription);

        // mutations keep working with nobody listening
        service
            .join(&match_id, &"p1".to_string())
            .await
            .expect("Failed to join");
    }
}
