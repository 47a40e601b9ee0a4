use thiserror::Error;

pub mod app;
pub mod division;
pub mod feed;
pub mod matches;
pub mod player;
pub mod roster;

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("already joined: {0}")]
    AlreadyJoined(String),

    #[error("not in list: {0}")]
    NotInList(String),

    #[error("player not found: {0}")]
    PlayerNotFound(String),

    #[error("invalid division: {0}")]
    InvalidDivision(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn already_joined<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::AlreadyJoined(msg.into()))
    }

    pub fn not_in_list<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::NotInList(msg.into()))
    }

    pub fn player_not_found<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::PlayerNotFound(msg.into()))
    }

    pub fn invalid_division<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::InvalidDivision(msg.into()))
    }

    pub fn not_found<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::NotFound(msg.into()))
    }

    pub fn forbidden<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Forbidden(msg.into()))
    }

    pub fn storage<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Storage(msg.into()))
    }

    pub fn internal<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Internal(msg.into()))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
