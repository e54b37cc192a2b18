use chrono::{Datelike, Duration, NaiveDate};

use crate::models::UserRecord;

/// Records whether every habit is done on `today`.
///
/// Sets `daily_history[today] = true` when the collection is non-empty and
/// all habits contain `today`, and removes the key otherwise. Other days are
/// left as they are. Returns the resulting flag.
pub fn recompute(record: &mut UserRecord, today: NaiveDate) -> bool {
    let all_done =
        !record.habits.is_empty() && record.habits.iter().all(|h| h.is_completed_on(today));
    if all_done {
        record.daily_history.insert(today, true);
    } else {
        record.daily_history.remove(&today);
    }
    all_done
}

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// Every habit was completed that day.
    pub success: bool,
    pub today: bool,
}

/// The days of one month with their completion flags.
#[derive(Debug, Clone)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDay>,
}

impl MonthView {
    /// English label such as "October 2026".
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.days[0].date
    }

    pub fn success_count(&self) -> usize {
        self.days.iter().filter(|d| d.success).count()
    }
}

/// Builds the grid for the month containing `month_of`, marking `today`
/// when it falls inside that month.
pub fn month_view(record: &UserRecord, month_of: NaiveDate, today: NaiveDate) -> MonthView {
    let first = month_of - Duration::days(i64::from(month_of.day0()));
    let days = std::iter::successors(Some(first), |d| d.succ_opt())
        .take_while(|d| d.month() == first.month())
        .map(|date| CalendarDay {
            date,
            success: record.is_success_day(date),
            today: date == today,
        })
        .collect();
    MonthView {
        year: first.year(),
        month: first.month(),
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habits::default_habits;
    use crate::models::Theme;

    fn record() -> UserRecord {
        UserRecord {
            username: "tester".into(),
            credential: None,
            password: None,
            habits: default_habits(),
            daily_history: Default::default(),
            theme: Theme::Light,
        }
    }

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[test]
    fn all_done_sets_flag_and_partial_removes_key() {
        let mut r = record();
        let today = day(10, 18);
        for h in r.habits.iter_mut() {
            h.toggle(today);
        }
        assert!(recompute(&mut r, today));
        assert_eq!(r.daily_history.get(&today), Some(&true));

        r.habits[3].toggle(today);
        assert!(!recompute(&mut r, today));
        assert!(!r.daily_history.contains_key(&today));
    }

    #[test]
    fn empty_collection_is_never_a_success() {
        let mut r = record();
        r.habits.clear();
        assert!(!recompute(&mut r, day(10, 18)));
        assert!(r.daily_history.is_empty());
    }

    #[test]
    fn past_days_are_left_alone() {
        let mut r = record();
        r.daily_history.insert(day(10, 1), true);
        recompute(&mut r, day(10, 18));
        assert!(r.is_success_day(day(10, 1)));
    }

    #[test]
    fn month_grid_marks_success_and_today() {
        let mut r = record();
        r.daily_history.insert(day(10, 3), true);
        r.daily_history.insert(day(9, 30), true);

        let view = month_view(&r, day(10, 18), day(10, 18));
        assert_eq!(view.days.len(), 31);
        assert_eq!(view.label(), "October 2026");
        assert_eq!(view.success_count(), 1);
        assert!(view.days[2].success);
        assert!(view.days[17].today);
        assert_eq!(view.days.iter().filter(|d| d.today).count(), 1);
    }

    #[test]
    fn other_months_have_no_today_marker() {
        let r = record();
        let feb = month_view(&r, day(2, 10), day(10, 18));
        assert_eq!(feb.days.len(), 28);
        assert!(feb.days.iter().all(|d| !d.today));

        let dec = month_view(&r, day(12, 25), day(10, 18));
        assert_eq!(dec.days.len(), 31);
        assert_eq!(dec.label(), "December 2026");
    }
}
