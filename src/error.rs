use thiserror::Error;

pub type HabitResult<T> = core::result::Result<T, HabitError>;

/// Failures of the snapshot files in the data directory.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot {0} not found")]
    Missing(String),
    #[error("snapshot {0} is corrupt: {1}")]
    Corrupt(String, serde_json::Error),
}

/// Errors surfaced to the user by session and habit operations.
#[derive(Error, Debug)]
pub enum HabitError {
    #[error("Please fill in all fields")]
    EmptyField,
    #[error("Username '{0}' already exists")]
    DuplicateUsername(String),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Not logged in. Use `habitust login <USERNAME>` first.")]
    NotLoggedIn,
    #[error("Habit name cannot be empty")]
    EmptyHabitName,
    #[error("Habit {0} not found")]
    HabitNotFound(u64),
    #[error("Invalid date '{0}'. Use YYYY-MM-DD.")]
    InvalidDate(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<std::io::Error> for HabitError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(StorageError::Io(err))
    }
}
