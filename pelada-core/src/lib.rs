mod balance;
mod position;
mod roster;
mod shuffle;

pub use balance::{SquadPlayer, TeamSheets, generate_balanced_division};
pub use position::FieldPosition;
pub use roster::{
    RosterEntry, WAITLIST_SLOTS, confirmed_count, is_full, join_rank, priority_order,
    sort_by_priority, waiting_count,
};
pub use shuffle::SeededRandom;

pub type PlayerId = String;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TeamColor {
    Black,
    White,
}

impl TeamColor {
    pub fn other(&self) -> TeamColor {
        match self {
            TeamColor::Black => TeamColor::White,
            TeamColor::White => TeamColor::Black,
        }
    }
}
