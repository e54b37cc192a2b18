use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::config::Config;
use crate::directory::UserDirectory;
use crate::error::{HabitError, HabitResult};
use crate::history::{self, MonthView};
use crate::models::{Habit, Theme, UserRecord};
use crate::progress::compute_progress;
use crate::quotes::random_quote;
use crate::storage::{Store, SESSION_FILE, USERS_FILE};

/// Source of "today". Defaults to the local calendar date.
pub type Clock = Box<dyn Fn() -> NaiveDate>;

/// Callback run after each state transition, whether or not it could be saved.
pub type Listener = Box<dyn FnMut(StateChange)>;

/// What changed, for front ends that re-render on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    LoggedIn,
    LoggedOut,
    HabitsChanged,
    ThemeChanged,
}

/// One habit as shown on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitRow {
    pub id: u64,
    pub name: String,
    pub done_today: bool,
}

/// Everything a front end needs to paint the logged-in view.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub username: String,
    pub theme: Theme,
    pub quote: &'static str,
    pub today: NaiveDate,
    /// Percentage of habits done today.
    pub progress: u8,
    pub habits: Vec<HabitRow>,
    pub calendar: MonthView,
}

/// Application state: the user directory, who is logged in, and the store
/// both are written to.
///
/// The session is a username key into the directory, so every read and
/// write of the current user goes through the same record.
pub struct Tracker {
    config: Config,
    store: Store,
    directory: UserDirectory,
    current: Option<String>,
    quote: &'static str,
    clock: Clock,
    listeners: Vec<Listener>,
}

impl Tracker {
    /// Loads both snapshots from the configured data directory.
    ///
    /// Missing or unreadable snapshots start empty and logged out. A session
    /// naming a user that is not in the directory is dropped.
    pub fn open(config: Config) -> Tracker {
        let store = Store::new(config.data_dir.clone());
        let directory: UserDirectory = store.read_or_default(USERS_FILE);
        let session: Option<UserRecord> = store.read_or_default(SESSION_FILE);
        let current = session
            .map(|r| r.username)
            .filter(|name| directory.contains(name));
        debug!(
            users = directory.len(),
            session = current.as_deref().unwrap_or("-"),
            "state loaded"
        );
        Tracker {
            config,
            store,
            directory,
            current,
            quote: random_quote(),
            clock: Box::new(|| Local::now().date_naive()),
            listeners: Vec::new(),
        }
    }

    /// Replaces the clock, mainly for tests and backfilling.
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDate + 'static) -> Tracker {
        self.clock = Box::new(clock);
        self
    }

    /// Registers a callback for state changes.
    pub fn subscribe(&mut self, listener: impl FnMut(StateChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_username(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The logged-in user's record.
    pub fn current_user(&self) -> Option<&UserRecord> {
        self.current.as_deref().and_then(|name| self.directory.get(name))
    }

    fn require_user(&self) -> HabitResult<&UserRecord> {
        self.current_user().ok_or(HabitError::NotLoggedIn)
    }

    /// Creates an account and logs into it.
    pub fn signup(&mut self, username: &str, password: &str) -> HabitResult<Dashboard> {
        self.directory
            .register(username, password, self.config.pbkdf2_iterations)?;
        info!(user = username, "account created");
        self.start_session(username)
    }

    /// Logs in with existing credentials.
    pub fn login(&mut self, username: &str, password: &str) -> HabitResult<Dashboard> {
        self.directory
            .authenticate(username, password, self.config.pbkdf2_iterations)?;
        self.start_session(username)
    }

    fn start_session(&mut self, username: &str) -> HabitResult<Dashboard> {
        self.current = Some(username.to_string());
        self.quote = random_quote();
        info!(user = username, "logged in");
        let saved = self.persist();
        self.notify(StateChange::LoggedIn);
        saved?;
        self.dashboard()
    }

    /// Ends the session and forgets it on disk.
    pub fn logout(&mut self) -> HabitResult<()> {
        let Some(name) = self.current.take() else {
            return Ok(());
        };
        info!(user = %name, "logged out");
        let removed = self.store.remove(SESSION_FILE);
        self.notify(StateChange::LoggedOut);
        removed?;
        Ok(())
    }

    /// Writes the whole directory and the session snapshot.
    pub fn persist(&self) -> HabitResult<()> {
        self.store.write(USERS_FILE, &self.directory)?;
        match self.current_user() {
            Some(record) => self.store.write(SESSION_FILE, record)?,
            None => self.store.remove(SESSION_FILE)?,
        }
        Ok(())
    }

    /// Applies `f` to the current user, then recomputes today's history,
    /// persists, and notifies.
    ///
    /// A failed save is returned to the caller but the in-memory change
    /// stays, and listeners still hear about it.
    fn mutate<T>(
        &mut self,
        change: StateChange,
        f: impl FnOnce(&mut UserRecord, NaiveDate) -> HabitResult<T>,
    ) -> HabitResult<T> {
        let today = self.today();
        let record = self
            .current
            .as_deref()
            .and_then(|name| self.directory.get_mut(name))
            .ok_or(HabitError::NotLoggedIn)?;
        let out = f(record, today)?;
        let all_done = history::recompute(record, today);
        debug!(user = %record.username, ?change, all_done, "state changed");
        let saved = self.persist();
        self.notify(change);
        saved?;
        Ok(out)
    }

    fn notify(&mut self, change: StateChange) {
        for listener in self.listeners.iter_mut() {
            listener(change);
        }
    }

    /// Appends a habit and returns its id.
    pub fn add_habit(&mut self, name: &str) -> HabitResult<u64> {
        self.mutate(StateChange::HabitsChanged, |record, _| record.add_habit(name))
    }

    /// Flips today's completion for a habit. Returns the new state.
    pub fn toggle_habit(&mut self, id: u64) -> HabitResult<bool> {
        let today = self.today();
        self.toggle_habit_on(id, today)
    }

    /// Flips completion on an arbitrary date. History is still only
    /// recomputed for today.
    pub fn toggle_habit_on(&mut self, id: u64, date: NaiveDate) -> HabitResult<bool> {
        self.mutate(StateChange::HabitsChanged, |record, _| {
            record.toggle_habit(id, date)
        })
    }

    /// Deletes a habit once `confirm` agrees.
    ///
    /// Returns `false` without touching anything when the confirmation is
    /// declined.
    pub fn delete_habit(
        &mut self,
        id: u64,
        confirm: impl FnOnce(&Habit) -> bool,
    ) -> HabitResult<bool> {
        let habit = self
            .require_user()?
            .habit(id)
            .ok_or(HabitError::HabitNotFound(id))?;
        if !confirm(habit) {
            debug!(id, "delete declined");
            return Ok(false);
        }
        self.mutate(StateChange::HabitsChanged, |record, _| {
            record.remove_habit(id).map(|_| true)
        })
    }

    /// Clears today's completions. Returns how many habits changed.
    pub fn reset_day(&mut self) -> HabitResult<usize> {
        let today = self.today();
        self.reset_day_on(today)
    }

    pub fn reset_day_on(&mut self, date: NaiveDate) -> HabitResult<usize> {
        self.mutate(StateChange::HabitsChanged, |record, _| {
            Ok(record.reset_day(date))
        })
    }

    /// Switches between light and dark. Returns the new theme.
    pub fn toggle_theme(&mut self) -> HabitResult<Theme> {
        self.mutate(StateChange::ThemeChanged, |record, _| {
            record.theme = record.theme.toggled();
            Ok(record.theme)
        })
    }

    /// Today's completion percentage for the current user.
    pub fn progress(&self) -> HabitResult<u8> {
        Ok(compute_progress(self.require_user()?, self.today()))
    }

    /// Month grid for the month containing `month_of`, or the current month.
    pub fn calendar(&self, month_of: Option<NaiveDate>) -> HabitResult<MonthView> {
        let today = self.today();
        let record = self.require_user()?;
        Ok(history::month_view(record, month_of.unwrap_or(today), today))
    }

    /// Quote picked when the session started.
    pub fn quote(&self) -> &'static str {
        self.quote
    }

    /// Snapshot of the logged-in view.
    pub fn dashboard(&self) -> HabitResult<Dashboard> {
        let today = self.today();
        let record = self.require_user()?;
        Ok(Dashboard {
            username: record.username.clone(),
            theme: record.theme,
            quote: self.quote,
            today,
            progress: compute_progress(record, today),
            habits: record
                .habits
                .iter()
                .map(|h| HabitRow {
                    id: h.id,
                    name: h.name.clone(),
                    done_today: h.is_completed_on(today),
                })
                .collect(),
            calendar: history::month_view(record, today, today),
        })
    }
}
