use std::cell::Cell;
use std::rc::Rc;

use ratatui::widgets::TableState;
use crate::error::HabitResult;
use crate::session::{Dashboard, Tracker};

#[derive(PartialEq, Clone, Copy)]
pub enum Screen {
    Auth,
    Dashboard,
}

#[derive(PartialEq, Clone, Copy)]
pub enum AuthMode {
    Login,
    Signup,
}

#[derive(PartialEq, Clone, Copy)]
pub enum AuthField {
    Username,
    Password,
}

/// Mutation waiting for a yes/no answer.
#[derive(PartialEq, Clone)]
pub enum PendingAction {
    Delete(u64, String),
    ResetDay,
}

#[derive(PartialEq, Clone)]
pub enum InputMode {
    Normal,
    Adding,
    Confirm(PendingAction),
}

pub struct App<'a> {
    pub tracker: &'a mut Tracker,
    pub screen: Screen,
    pub auth_mode: AuthMode,
    pub auth_field: AuthField,
    pub username_input: String,
    pub password_input: String,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub state: TableState,
    /// Blocking message shown until the next key press.
    pub notice: Option<String>,
    pub dashboard: Option<Dashboard>,
    pub should_quit: bool,
    dirty: Rc<Cell<bool>>,
}

impl<'a> App<'a> {
    /// Creates the app, starting on the dashboard when a session was restored.
    pub fn new(tracker: &'a mut Tracker) -> App<'a> {
        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        tracker.subscribe(move |_| flag.set(true));

        let screen = if tracker.is_logged_in() { Screen::Dashboard } else { Screen::Auth };
        let mut app = App {
            tracker,
            screen,
            auth_mode: AuthMode::Login,
            auth_field: AuthField::Username,
            username_input: String::new(),
            password_input: String::new(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            state: TableState::default(),
            notice: None,
            dashboard: None,
            should_quit: false,
            dirty,
        };
        app.refresh();
        app
    }

    /// Rebuilds the dashboard if the tracker reported a change or the day
    /// rolled over.
    pub fn refresh(&mut self) {
        let changed = self.dirty.replace(false);
        let stale = self
            .dashboard
            .as_ref()
            .is_some_and(|d| d.today != self.tracker.today());
        if !changed && !stale {
            return;
        }
        self.dashboard = self.tracker.dashboard().ok();
        self.screen = if self.dashboard.is_some() { Screen::Dashboard } else { Screen::Auth };

        let len = self.dashboard.as_ref().map_or(0, |d| d.habits.len());
        if len == 0 {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= len {
                self.state.select(Some(len - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    fn report(&mut self, result: HabitResult<()>) {
        if let Err(e) = result {
            self.notice = Some(e.to_string());
        }
        self.refresh();
    }

    // --- Auth screen ---

    pub fn auth_input(&mut self) -> &mut String {
        match self.auth_field {
            AuthField::Username => &mut self.username_input,
            AuthField::Password => &mut self.password_input,
        }
    }

    pub fn switch_auth_field(&mut self) {
        self.auth_field = match self.auth_field {
            AuthField::Username => AuthField::Password,
            AuthField::Password => AuthField::Username,
        };
    }

    pub fn switch_auth_mode(&mut self) {
        self.auth_mode = match self.auth_mode {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        };
    }

    /// Submits the login or signup form.
    pub fn submit_auth(&mut self) {
        let username = self.username_input.trim().to_string();
        let password = self.password_input.trim().to_string();
        let result = match self.auth_mode {
            AuthMode::Login => self.tracker.login(&username, &password),
            AuthMode::Signup => self.tracker.signup(&username, &password),
        };
        if self.tracker.is_logged_in() {
            self.clear_auth_form();
            self.state.select(None);
        }
        self.report(result.map(|_| ()));
    }

    fn clear_auth_form(&mut self) {
        self.username_input.clear();
        self.password_input.clear();
        self.auth_field = AuthField::Username;
    }

    // --- Dashboard ---

    fn selected_habit(&self) -> Option<(u64, String)> {
        let i = self.state.selected()?;
        let habit = self.dashboard.as_ref()?.habits.get(i)?;
        Some((habit.id, habit.name.clone()))
    }

    pub fn next(&mut self) {
        let len = self.dashboard.as_ref().map_or(0, |d| d.habits.len());
        if len == 0 { return; }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.dashboard.as_ref().map_or(0, |d| d.habits.len());
        if len == 0 { return; }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Toggles today's completion of the selected habit.
    pub fn toggle_selected(&mut self) {
        if let Some((id, _)) = self.selected_habit() {
            let result = self.tracker.toggle_habit(id).map(|_| ());
            self.report(result);
        }
    }

    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input_buffer.clear();
    }

    /// Adds a habit from the input buffer. Blank input keeps the prompt open.
    pub fn submit_add(&mut self) {
        if self.input_buffer.trim().is_empty() {
            return;
        }
        let name = std::mem::take(&mut self.input_buffer);
        self.input_mode = InputMode::Normal;
        let result = self.tracker.add_habit(&name).map(|_| ());
        self.report(result);
        let len = self.dashboard.as_ref().map_or(0, |d| d.habits.len());
        if len > 0 {
            self.state.select(Some(len - 1));
        }
    }

    pub fn ask_delete(&mut self) {
        if let Some((id, name)) = self.selected_habit() {
            self.input_mode = InputMode::Confirm(PendingAction::Delete(id, name));
        }
    }

    pub fn ask_reset(&mut self) {
        self.input_mode = InputMode::Confirm(PendingAction::ResetDay);
    }

    /// Resolves a pending confirmation.
    pub fn answer(&mut self, yes: bool) {
        let InputMode::Confirm(action) = std::mem::replace(&mut self.input_mode, InputMode::Normal) else {
            return;
        };
        if !yes {
            return;
        }
        let result = match action {
            PendingAction::Delete(id, _) => self.tracker.delete_habit(id, |_| true).map(|_| ()),
            PendingAction::ResetDay => self.tracker.reset_day().map(|_| ()),
        };
        self.report(result);
    }

    pub fn toggle_theme(&mut self) {
        let result = self.tracker.toggle_theme().map(|_| ());
        self.report(result);
    }

    /// Logs out and returns to an empty login form.
    pub fn logout(&mut self) {
        let result = self.tracker.logout();
        self.clear_auth_form();
        self.auth_mode = AuthMode::Login;
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.report(result);
    }
}
