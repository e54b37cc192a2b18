use std::io::{self, BufRead, Write};
use chrono::{Datelike, NaiveDate};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use crate::error::{HabitError, HabitResult};
use crate::history::MonthView;
use crate::session::{Dashboard, Tracker};

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> HabitResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| HabitError::InvalidDate(s.to_string()))
}

/// Parses a `YYYY-MM` month into its first day.
pub fn parse_month(s: &str) -> HabitResult<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| HabitError::InvalidDate(s.to_string()))
}

/// Reads one line from stdin after printing `prompt`.
fn prompt_line(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Asks a yes/no question. Anything but `y` counts as no.
fn confirm(prompt: &str) -> bool {
    match prompt_line(&format!("{prompt} [y/N] ")) {
        Ok(answer) => answer.to_lowercase() == "y",
        Err(_) => false,
    }
}

fn password_or_prompt(password: Option<String>) -> HabitResult<String> {
    match password {
        Some(p) => Ok(p.trim().to_string()),
        None => Ok(prompt_line("Password: ")?),
    }
}

/// Registers a new account and logs into it.
pub fn cmd_signup(tracker: &mut Tracker, username: String, password: Option<String>, silent: bool) -> HabitResult<()> {
    let password = password_or_prompt(password)?;
    let dashboard = tracker.signup(username.trim(), &password)?;
    if !silent {
        println!("Account '{}' created with {} starter habits.", dashboard.username, dashboard.habits.len());
        print_greeting(&dashboard);
    }
    Ok(())
}

/// Logs into an existing account.
pub fn cmd_login(tracker: &mut Tracker, username: String, password: Option<String>, silent: bool) -> HabitResult<()> {
    let password = password_or_prompt(password)?;
    let dashboard = tracker.login(username.trim(), &password)?;
    if !silent { print_greeting(&dashboard); }
    Ok(())
}

/// Ends the current session.
pub fn cmd_logout(tracker: &mut Tracker, silent: bool) -> HabitResult<()> {
    let name = tracker.current_username().map(str::to_string);
    tracker.logout()?;
    if !silent {
        match name {
            Some(n) => println!("Goodbye, {}.", n),
            None => println!("Not logged in."),
        }
    }
    Ok(())
}

/// Prints who is logged in.
pub fn cmd_whoami(tracker: &Tracker) {
    match tracker.current_user() {
        Some(user) => println!("{} ({:?} theme)", user.username, user.theme),
        None => println!("Not logged in."),
    }
}

/// Adds a habit to the current user's list.
pub fn cmd_add(tracker: &mut Tracker, name: String, silent: bool) -> HabitResult<()> {
    let id = tracker.add_habit(&name)?;
    if !silent { println!("Habit added (id = {})", id); }
    Ok(())
}

/// Flips completion of a habit for today, or for `date` when given.
pub fn cmd_toggle(tracker: &mut Tracker, id: u64, date: Option<String>, silent: bool) -> HabitResult<()> {
    let done = match date {
        Some(d) => tracker.toggle_habit_on(id, parse_date(&d)?)?,
        None => tracker.toggle_habit(id)?,
    };
    if !silent {
        println!("Habit {} marked as {}.", id, if done { "done" } else { "not done" });
        println!("{}% Completed", tracker.progress()?);
    }
    Ok(())
}

/// Removes a habit after confirmation.
pub fn cmd_delete(tracker: &mut Tracker, id: u64, force: bool, silent: bool) -> HabitResult<()> {
    let deleted = tracker.delete_habit(id, |habit| {
        force || confirm(&format!("Are you sure you want to delete '{}'?", habit.name))
    })?;
    if !silent {
        if deleted { println!("Habit {} removed.", id); } else { println!("Aborted."); }
    }
    Ok(())
}

/// Clears one day's completions from every habit.
pub fn cmd_reset(tracker: &mut Tracker, date: Option<String>, force: bool, silent: bool) -> HabitResult<()> {
    if !tracker.is_logged_in() {
        return Err(HabitError::NotLoggedIn);
    }
    let date = match date {
        Some(d) => parse_date(&d)?,
        None => tracker.today(),
    };
    if !force && !confirm(&format!("Clear every habit's completion for {}?", date)) {
        if !silent { println!("Aborted."); }
        return Ok(());
    }
    let changed = tracker.reset_day_on(date)?;
    if !silent { println!("Reset {} habit(s) for {}.", changed, date); }
    Ok(())
}

/// Switches between the light and dark theme.
pub fn cmd_theme(tracker: &mut Tracker, silent: bool) -> HabitResult<()> {
    let theme = tracker.toggle_theme()?;
    if !silent { println!("Theme set to {:?}.", theme); }
    Ok(())
}

/// Lists habits with today's state, progress, and the session quote.
pub fn cmd_list(tracker: &Tracker) -> HabitResult<()> {
    let dashboard = tracker.dashboard()?;
    print_greeting(&dashboard);
    if dashboard.habits.is_empty() {
        println!("No habits found.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Habit").add_attribute(Attribute::Bold),
            Cell::new("Today").add_attribute(Attribute::Bold),
        ]);

    for h in &dashboard.habits {
        let (mark, color) = if h.done_today { ("✔", Color::Green) } else { ("·", Color::Grey) };
        table.add_row(vec![
            Cell::new(h.id),
            Cell::new(&h.name),
            Cell::new(mark).fg(color),
        ]);
    }

    println!("{table}");
    println!("{}", progress_line(dashboard.progress));
    Ok(())
}

/// Prints the month grid. Green days had every habit completed.
pub fn cmd_calendar(tracker: &Tracker, month: Option<String>) -> HabitResult<()> {
    let month_of = month.as_deref().map(parse_month).transpose()?;
    let view = tracker.calendar(month_of)?;
    println!("{}", view.label());
    println!("{}", render_month(&view));
    println!("{} of {} days fully completed.", view.success_count(), view.days.len());
    Ok(())
}

/// Prints the quote picked for this session.
pub fn cmd_quote(tracker: &Tracker) {
    println!("\"{}\"", tracker.quote());
}

fn print_greeting(dashboard: &Dashboard) {
    println!("Hello, {}", dashboard.username);
    println!("\"{}\"", dashboard.quote);
}

/// Text progress bar, e.g. `[#####-----] 50% Completed`.
pub fn progress_line(progress: u8) -> String {
    let filled = usize::from(progress) / 10;
    format!("[{}{}] {}% Completed", "#".repeat(filled), "-".repeat(10 - filled), progress)
}

/// Lays a month out in Monday-first weeks.
pub fn render_month(view: &MonthView) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(
            ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
                .iter()
                .map(|d| Cell::new(d).add_attribute(Attribute::Bold)),
        );

    let lead = view.first_day().weekday().num_days_from_monday() as usize;
    let mut row: Vec<Cell> = (0..lead).map(|_| Cell::new("")).collect();
    for day in &view.days {
        let mut cell = Cell::new(day.date.day());
        if day.success {
            cell = cell.fg(Color::Green).add_attribute(Attribute::Bold);
        }
        if day.today {
            cell = cell.add_attribute(Attribute::Reverse);
        }
        row.push(cell);
        if row.len() == 7 {
            table.add_row(std::mem::take(&mut row));
        }
    }
    if !row.is_empty() {
        table.add_row(row);
    }
    table
}
