pub mod auth;
pub mod commands;
pub mod config;
pub mod directory;
pub mod error;
pub mod habits;
pub mod history;
pub mod models;
pub mod progress;
pub mod quotes;
pub mod session;
pub mod storage;
pub mod tui;

pub use config::Config;
pub use error::{HabitError, HabitResult, StorageError};
pub use session::{Dashboard, StateChange, Tracker};
