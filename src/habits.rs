use chrono::{NaiveDate, Utc};

use crate::error::{HabitError, HabitResult};
use crate::models::{Habit, UserRecord};

/// Habits every new account starts with.
const DEFAULT_HABITS: [&str; 6] = [
    "Morning Meditation",
    "Drink Water (2L)",
    "Read 20 Pages",
    "Workout / Yoga",
    "Skin Care Routine",
    "Journaling",
];

/// Builds a fresh copy of the starter habits, ids 1 through 6.
pub fn default_habits() -> Vec<Habit> {
    DEFAULT_HABITS
        .iter()
        .zip(1u64..)
        .map(|(name, id)| Habit::new(id, *name))
        .collect()
}

/// Picks an id from the creation time, bumped past every existing id.
pub fn next_habit_id(habits: &[Habit], now_millis: u64) -> u64 {
    let next = habits.iter().map(|h| h.id).max().unwrap_or(0) + 1;
    now_millis.max(next)
}

fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

impl UserRecord {
    /// Looks up a habit by id.
    pub fn habit(&self, id: u64) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    fn habit_mut(&mut self, id: u64) -> HabitResult<&mut Habit> {
        self.habits
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or(HabitError::HabitNotFound(id))
    }

    /// Appends a new habit with a trimmed name and returns its id.
    pub fn add_habit(&mut self, name: &str) -> HabitResult<u64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(HabitError::EmptyHabitName);
        }
        let id = next_habit_id(&self.habits, now_millis());
        self.habits.push(Habit::new(id, name));
        Ok(id)
    }

    /// Removes a habit, returning it.
    pub fn remove_habit(&mut self, id: u64) -> HabitResult<Habit> {
        let idx = self
            .habits
            .iter()
            .position(|h| h.id == id)
            .ok_or(HabitError::HabitNotFound(id))?;
        Ok(self.habits.remove(idx))
    }

    /// Flips completion of a habit on `date`. Returns the new state.
    pub fn toggle_habit(&mut self, id: u64, date: NaiveDate) -> HabitResult<bool> {
        Ok(self.habit_mut(id)?.toggle(date))
    }

    /// Clears `date` from every habit. Returns how many habits changed.
    pub fn reset_day(&mut self, date: NaiveDate) -> usize {
        self.habits
            .iter_mut()
            .map(|h| h.completed_dates.remove(&date))
            .filter(|removed| *removed)
            .count()
    }

    /// Number of habits completed on `date`.
    pub fn completed_on(&self, date: NaiveDate) -> usize {
        self.habits.iter().filter(|h| h.is_completed_on(date)).count()
    }
}
