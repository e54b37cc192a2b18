use habitust::models::Theme;
use habitust::progress::compute_progress;
use habitust::storage::{SESSION_FILE, USERS_FILE};
use habitust::{Config, HabitError, StateChange, Tracker};
use chrono::NaiveDate;
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use tempfile::tempdir;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

fn open(dir: &Path) -> Tracker {
    Tracker::open(Config::with_dir(dir).iterations(10)).with_clock(|| day(18))
}

#[test]
fn register_then_authenticate_gives_default_habits() {
    let dir = tempdir().expect("tempdir");
    let mut t = open(dir.path());
    t.signup("alice", "pw1").unwrap();
    t.logout().unwrap();

    let dashboard = t.login("alice", "pw1").unwrap();
    assert_eq!(dashboard.habits.len(), 6);
    let user = t.current_user().unwrap();
    assert!(user.habits.iter().all(|h| h.completed_dates.is_empty()));
    assert_eq!(user.theme, Theme::Light);
    assert!(user.daily_history.is_empty());
}

#[test]
fn duplicate_signup_leaves_existing_record() {
    let dir = tempdir().expect("tempdir");
    let mut t = open(dir.path());
    t.signup("alice", "pw1").unwrap();
    t.toggle_habit(1).unwrap();
    let before = t.current_user().cloned();

    assert!(matches!(t.signup("alice", "other"), Err(HabitError::DuplicateUsername(_))));
    assert_eq!(t.directory().get("alice").cloned(), before);
    assert!(matches!(t.signup("", "pw"), Err(HabitError::EmptyField)));
}

#[test]
fn all_done_scenario_and_reset() {
    let dir = tempdir().expect("tempdir");
    let mut t = open(dir.path());
    t.signup("alice", "pw1").unwrap();
    for id in 1..=6 {
        t.toggle_habit(id).unwrap();
    }
    assert!(t.current_user().unwrap().is_success_day(day(18)));
    assert_eq!(t.progress().unwrap(), 100);

    t.reset_day().unwrap();
    assert!(!t.current_user().unwrap().daily_history.contains_key(&day(18)));
    assert_eq!(t.progress().unwrap(), 0);
}

#[test]
fn adding_a_habit_to_a_completed_day_clears_the_flag() {
    let dir = tempdir().expect("tempdir");
    let mut t = open(dir.path());
    t.signup("bob", "pw2").unwrap();
    for id in 1..=6 {
        t.toggle_habit(id).unwrap();
    }
    assert!(t.current_user().unwrap().is_success_day(day(18)));

    let id = t.add_habit("Stretch").unwrap();
    let user = t.current_user().unwrap();
    assert_eq!(user.habits.len(), 7);
    assert!(user.habits.iter().filter(|h| h.id == id).count() == 1);
    assert!(user.habit(id).unwrap().completed_dates.is_empty());
    assert!(!user.daily_history.contains_key(&day(18)));
}

#[test]
fn toggle_is_an_involution_and_past_days_keep_their_history() {
    let dir = tempdir().expect("tempdir");
    let mut t = open(dir.path());
    t.signup("carol", "pw").unwrap();

    let before = t.current_user().unwrap().habit(4).unwrap().completed_dates.clone();
    t.toggle_habit_on(4, day(2)).unwrap();
    t.toggle_habit_on(4, day(2)).unwrap();
    assert_eq!(t.current_user().unwrap().habit(4).unwrap().completed_dates, before);

    for id in 1..=6 {
        t.toggle_habit_on(id, day(3)).unwrap();
    }
    // only today's entry is ever derived
    assert!(!t.current_user().unwrap().is_success_day(day(3)));
}

#[test]
fn reset_day_only_clears_today() {
    let dir = tempdir().expect("tempdir");
    let mut t = open(dir.path());
    t.signup("dave", "pw").unwrap();
    t.toggle_habit_on(1, day(17)).unwrap();
    t.toggle_habit(1).unwrap();

    assert_eq!(t.reset_day().unwrap(), 1);
    let habit = t.current_user().unwrap().habit(1).unwrap();
    assert!(habit.is_completed_on(day(17)));
    assert!(!habit.is_completed_on(day(18)));
}

#[test]
fn progress_rounds_to_nearest() {
    let dir = tempdir().expect("tempdir");
    let mut t = open(dir.path());
    t.signup("erin", "pw").unwrap();
    for id in [4, 5, 6] {
        t.delete_habit(id, |_| true).unwrap();
    }
    t.toggle_habit(1).unwrap();
    assert_eq!(t.progress().unwrap(), 33);

    let mut user = t.current_user().unwrap().clone();
    user.habits.clear();
    assert_eq!(compute_progress(&user, day(18)), 0);
}

#[test]
fn declined_delete_keeps_the_habit() {
    let dir = tempdir().expect("tempdir");
    let mut t = open(dir.path());
    t.signup("frank", "pw").unwrap();

    let mut asked = None;
    let deleted = t
        .delete_habit(2, |h| {
            asked = Some(h.name.clone());
            false
        })
        .unwrap();
    assert!(!deleted);
    assert_eq!(asked.as_deref(), Some("Drink Water (2L)"));
    assert_eq!(t.current_user().unwrap().habits.len(), 6);

    assert!(t.delete_habit(2, |_| true).unwrap());
    assert!(t.current_user().unwrap().habit(2).is_none());
}

#[test]
fn state_survives_restart_and_logout_clears_session() {
    let dir = tempdir().expect("tempdir");
    {
        let mut t = open(dir.path());
        t.signup("gina", "pw").unwrap();
        t.toggle_theme().unwrap();
        t.toggle_habit(1).unwrap();
    }

    let mut t = open(dir.path());
    assert_eq!(t.current_username(), Some("gina"));
    let dashboard = t.dashboard().unwrap();
    assert_eq!(dashboard.theme, Theme::Dark);
    assert!(dashboard.habits[0].done_today);

    t.logout().unwrap();
    assert!(!dir.path().join(SESSION_FILE).exists());
    assert!(!open(dir.path()).is_logged_in());
    assert!(open(dir.path()).directory().contains("gina"));
}

#[test]
fn passwords_are_not_stored_in_plaintext() {
    let dir = tempdir().expect("tempdir");
    let mut t = open(dir.path());
    t.signup("hank", "hunter2").unwrap();
    let raw = fs::read_to_string(dir.path().join(USERS_FILE)).unwrap();
    assert!(!raw.contains("hunter2"));
    assert!(raw.contains("\"credential\""));
}

#[test]
fn corrupt_snapshots_degrade_to_logged_out() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join(USERS_FILE), "{ broken").unwrap();
    fs::write(dir.path().join(SESSION_FILE), "[]").unwrap();
    let t = open(dir.path());
    assert!(t.directory().is_empty());
    assert!(!t.is_logged_in());
}

#[test]
fn session_for_unknown_user_is_dropped() {
    let dir = tempdir().expect("tempdir");
    {
        let mut t = open(dir.path());
        t.signup("ivy", "pw").unwrap();
    }
    fs::write(dir.path().join(USERS_FILE), "{}").unwrap();
    let t = open(dir.path());
    assert!(!t.is_logged_in());
    assert!(matches!(t.dashboard(), Err(HabitError::NotLoggedIn)));
}

#[test]
fn legacy_plaintext_users_log_in_once_and_are_upgraded() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join(USERS_FILE),
        r#"{"jan":{"username":"jan","password":"old","habits":[{"id":1,"name":"Read","completedDates":["2026-10-18"]}],"dailyHistory":{"2026-10-17":true},"theme":"light"}}"#,
    )
    .unwrap();

    let mut t = open(dir.path());
    assert!(matches!(t.login("jan", "wrong"), Err(HabitError::InvalidCredentials)));
    let dashboard = t.login("jan", "old").unwrap();
    assert_eq!(dashboard.progress, 100);
    assert!(dashboard.calendar.days[16].success);

    let raw = fs::read_to_string(dir.path().join(USERS_FILE)).unwrap();
    assert!(!raw.contains("\"password\""));
    t.logout().unwrap();
    assert!(t.login("jan", "old").is_ok());
}

#[test]
fn listeners_see_each_transition() {
    let dir = tempdir().expect("tempdir");
    let mut t = open(dir.path());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    t.subscribe(move |change| sink.borrow_mut().push(change));

    t.signup("kim", "pw").unwrap();
    t.toggle_habit(1).unwrap();
    t.toggle_theme().unwrap();
    let _ = t.login("kim", "bad");
    t.logout().unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![
            StateChange::LoggedIn,
            StateChange::HabitsChanged,
            StateChange::ThemeChanged,
            StateChange::LoggedOut,
        ]
    );
}

#[test]
fn calendar_marks_current_month() {
    let dir = tempdir().expect("tempdir");
    let mut t = open(dir.path());
    t.signup("lee", "pw").unwrap();
    for id in 1..=6 {
        t.toggle_habit(id).unwrap();
    }
    let view = t.calendar(None).unwrap();
    assert_eq!(view.label(), "October 2026");
    assert_eq!(view.days.len(), 31);
    assert!(view.days[17].success && view.days[17].today);
    assert_eq!(view.success_count(), 1);

    let september = t.calendar(Some(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap())).unwrap();
    assert_eq!(september.days.len(), 30);
    assert!(september.days.iter().all(|d| !d.today && !d.success));
}

#[test]
fn failed_saves_keep_memory_and_listeners_in_step() {
    let dir = tempdir().expect("tempdir");
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "").unwrap();
    let mut t = open(&blocker);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    t.subscribe(move |change| sink.borrow_mut().push(change));

    assert!(matches!(t.signup("zoe", "pw"), Err(HabitError::Storage(_))));
    assert_eq!(t.current_username(), Some("zoe"));
    assert!(matches!(t.signup("zoe", "pw"), Err(HabitError::DuplicateUsername(_))));

    assert!(matches!(t.toggle_habit(1), Err(HabitError::Storage(_))));
    assert_eq!(t.progress().unwrap(), 17);

    assert!(t.logout().is_err());
    assert!(!t.is_logged_in());

    assert_eq!(
        *seen.borrow(),
        vec![StateChange::LoggedIn, StateChange::HabitsChanged, StateChange::LoggedOut]
    );
}
