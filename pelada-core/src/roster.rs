use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::PlayerId;

/// Slots available past match capacity before the list stops taking joins.
pub const WAITLIST_SLOTS: u32 = 4;

/// Ordering inputs of one attendance entry.
#[derive(Clone, Debug, PartialEq)]
pub struct RosterEntry {
    pub player_id: PlayerId,
    pub monthly_payer: bool,
    pub joined_at: DateTime<Utc>,
}

/// Roster order on (monthly_payer, joined_at) keys: payers ahead of everyone
/// else, earlier joins first within each class.
pub fn priority_order(a: (bool, DateTime<Utc>), b: (bool, DateTime<Utc>)) -> Ordering {
    b.0.cmp(&a.0).then(a.1.cmp(&b.1))
}

/// Sorts entries into roster order. Stable, so equal keys keep their stored
/// order.
pub fn sort_by_priority(entries: &mut [RosterEntry]) {
    entries.sort_by(|a, b| {
        priority_order((a.monthly_payer, a.joined_at), (b.monthly_payer, b.joined_at))
    });
}

/// 1-based position a new entry takes: a monthly payer lands right after the
/// last payer already in the list, anyone else goes to the end.
pub fn join_rank(entries: &[RosterEntry], monthly_payer: bool) -> u32 {
    if monthly_payer {
        entries.iter().filter(|e| e.monthly_payer).count() as u32 + 1
    } else {
        entries.len() as u32 + 1
    }
}

pub fn confirmed_count(total: usize, max_players: u32) -> usize {
    total.min(max_players as usize)
}

pub fn waiting_count(total: usize, max_players: u32) -> usize {
    total.saturating_sub(max_players as usize)
}

pub fn is_full(total: usize, max_players: u32) -> bool {
    total >= (max_players + WAITLIST_SLOTS) as usize
}
