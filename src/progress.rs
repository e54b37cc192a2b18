use chrono::NaiveDate;
use crate::models::UserRecord;

/// Percentage of a user's habits completed on `date`.
///
/// `round(100 * completed / total)`, with halves rounded up.
///
/// # Returns
/// - `0` if the user has no habits.
/// - A value in `0..=100` otherwise.
pub fn compute_progress(record: &UserRecord, date: NaiveDate) -> u8 {
    let total = record.habits.len();
    if total == 0 {
        return 0;
    }
    let done = record.completed_on(date);
    let pct = (done as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}
