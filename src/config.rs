use std::path::PathBuf;

/// Default PBKDF2 cost for new credentials.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

/// Runtime settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `users.json` and `current_user.json`.
    pub data_dir: PathBuf,
    /// Iteration count used when hashing new passwords.
    pub pbkdf2_iterations: u32,
}

impl Config {
    /// Reads the configuration from the environment.
    ///
    /// The data directory is determined in the following order:
    /// 1. `HABITS_DB` environment variable.
    /// 2. `~/.local/share/habitust` (on Linux).
    /// 3. `./habitust` (fallback).
    ///
    /// `HABITS_PBKDF2_ITERATIONS` overrides the hashing cost.
    pub fn from_env() -> Config {
        let data_dir = std::env::var("HABITS_DB").map(PathBuf::from).unwrap_or_else(|_| {
            let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push("habitust");
            p
        });
        let pbkdf2_iterations = std::env::var("HABITS_PBKDF2_ITERATIONS")
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_PBKDF2_ITERATIONS)
            .max(1);
        Config { data_dir, pbkdf2_iterations }
    }

    /// Configuration rooted at an explicit directory.
    pub fn with_dir(data_dir: impl Into<PathBuf>) -> Config {
        Config {
            data_dir: data_dir.into(),
            pbkdf2_iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }

    pub fn iterations(mut self, iterations: u32) -> Config {
        self.pbkdf2_iterations = iterations.max(1);
        self
    }
}
