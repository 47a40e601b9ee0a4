use std::sync::Arc;

use crate::{
    division::{ArcDivisionRepository, ArcDivisionService, DivisionServiceImpl},
    matches::ArcMatchRepository,
    player::{ArcPlayerDirectory, ArcPlayerRepository, PlayerDirectoryImpl},
    roster::{ArcAttendanceRepository, ArcRosterService, RosterServiceImpl},
};

#[derive(Clone)]
pub struct AppState {
    pub player_directory: ArcPlayerDirectory,
    pub match_repository: ArcMatchRepository,
    pub roster_service: ArcRosterService,
    pub division_service: ArcDivisionService,
}

/// Builds the service graph on top of the given repositories. Services are
/// constructed bottom-up; the directory feeds the roster, the roster feeds
/// the division service.
pub fn construct_app(
    player_repository: ArcPlayerRepository,
    match_repository: ArcMatchRepository,
    attendance_repository: ArcAttendanceRepository,
    division_repository: ArcDivisionRepository,
) -> AppState {
    let player_directory: ArcPlayerDirectory =
        Arc::new(Box::new(PlayerDirectoryImpl::new(player_repository)));
    let roster_service: ArcRosterService = Arc::new(Box::new(RosterServiceImpl::new(
        player_directory.clone(),
        match_repository.clone(),
        attendance_repository,
    )));
    let division_service: ArcDivisionService = Arc::new(Box::new(DivisionServiceImpl::new(
        roster_service.clone(),
        player_directory.clone(),
        division_repository,
    )));
    AppState {
        player_directory,
        match_repository,
        roster_service,
        division_service,
    }
}
