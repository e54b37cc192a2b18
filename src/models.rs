use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Color scheme chosen by a user.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Returns the other theme.
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

/// A salted one-way password hash.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Base64-encoded random salt.
    pub salt: String,
    /// Base64-encoded PBKDF2-HMAC-SHA256 derived key.
    pub hash: String,
    /// PBKDF2 iteration count used to derive `hash`.
    pub iterations: u32,
}

/// A single habit tracked by a user.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier within the owning user's collection.
    pub id: u64,
    /// Display label, trimmed and non-empty.
    pub name: String,
    /// Days on which the habit was completed.
    #[serde(default, deserialize_with = "nullable_dates")]
    pub completed_dates: BTreeSet<NaiveDate>,
}

impl Habit {
    pub fn new(id: u64, name: impl Into<String>) -> Habit {
        Habit {
            id,
            name: name.into(),
            completed_dates: BTreeSet::new(),
        }
    }

    /// Whether the habit was completed on `date`.
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }

    /// Adds `date` if absent, removes it otherwise. Returns the new state.
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        if self.completed_dates.remove(&date) {
            false
        } else {
            self.completed_dates.insert(date);
            true
        }
    }
}

/// Everything stored for one account.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Unique key in the user directory.
    pub username: String,
    /// Hashed password. Absent only on records written before hashing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<Credential>,
    /// Plaintext password from a legacy record, cleared on first login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Habits in display order.
    #[serde(default)]
    pub habits: Vec<Habit>,
    /// Days on which every habit was completed. Only `true` is ever stored.
    #[serde(default)]
    pub daily_history: BTreeMap<NaiveDate, bool>,
    #[serde(default)]
    pub theme: Theme,
}

impl UserRecord {
    /// Whether `date` is recorded as a fully completed day.
    pub fn is_success_day(&self, date: NaiveDate) -> bool {
        self.daily_history.get(&date).copied().unwrap_or(false)
    }
}

// Legacy records may carry `"completedDates": null`.
fn nullable_dates<'de, D>(deserializer: D) -> Result<BTreeSet<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeSet<NaiveDate>>::deserialize(deserializer)?.unwrap_or_default())
}
