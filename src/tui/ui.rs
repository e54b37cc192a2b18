use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, Wrap},
    Frame,
};
use chrono::Datelike;
use crate::history::MonthView;
use crate::models::Theme;
use crate::session::Dashboard;
use super::app::{App, AuthField, AuthMode, InputMode, PendingAction, Screen};

/// Colors for one theme.
struct Palette {
    bg: Color,
    fg: Color,
    muted: Color,
    accent: Color,
    success: Color,
    highlight: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            bg: Color::White,
            fg: Color::Black,
            muted: Color::DarkGray,
            accent: Color::Blue,
            success: Color::Green,
            highlight: Color::Gray,
        },
        Theme::Dark => Palette {
            bg: Color::Black,
            fg: Color::White,
            muted: Color::Gray,
            accent: Color::Cyan,
            success: Color::LightGreen,
            highlight: Color::DarkGray,
        },
    }
}

pub fn ui(f: &mut Frame, app: &mut App) {
    match (app.screen, app.dashboard.clone()) {
        (Screen::Dashboard, Some(dashboard)) => draw_dashboard(f, app, &dashboard),
        _ => draw_auth(f, app),
    }

    if let InputMode::Confirm(action) = &app.input_mode {
        let question = match action {
            PendingAction::Delete(_, name) => format!("Are you sure you want to delete '{}'? (y/n)", name),
            PendingAction::ResetDay => "Clear today's completions for every habit? (y/n)".to_string(),
        };
        popup(f, "Confirm", &question, Color::Yellow);
    } else if let InputMode::Adding = app.input_mode {
        popup(f, "Add Habit: Enter Name", &app.input_buffer, Color::Yellow);
    }

    if let Some(notice) = &app.notice {
        popup(f, "Notice (press any key)", notice, Color::Red);
    }
}

fn draw_auth(f: &mut Frame, app: &App) {
    let p = palette(Theme::Light);
    let area = centered_rect(50, 9, f.area());
    f.render_widget(Clear, area);

    let title = match app.auth_mode {
        AuthMode::Login => "Habitust - Login",
        AuthMode::Signup => "Habitust - Sign Up",
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(1)].as_ref())
        .split(inner);

    let field_style = |field: AuthField| {
        if app.auth_field == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(p.muted)
        }
    };

    let username = Paragraph::new(app.username_input.as_str())
        .style(field_style(AuthField::Username))
        .block(Block::default().borders(Borders::ALL).title("Username"));
    f.render_widget(username, rows[0]);

    let masked = "*".repeat(app.password_input.chars().count());
    let password = Paragraph::new(masked)
        .style(field_style(AuthField::Password))
        .block(Block::default().borders(Borders::ALL).title("Password"));
    f.render_widget(password, rows[1]);

    let switch_hint = match app.auth_mode {
        AuthMode::Login => "Ctrl+S: Sign up instead",
        AuthMode::Signup => "Ctrl+S: Log in instead",
    };
    let help = Paragraph::new(format!("Tab: Field | Enter: Submit | {} | Esc: Quit", switch_hint))
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true });
    f.render_widget(help, rows[2]);
}

fn draw_dashboard(f: &mut Frame, app: &mut App, dashboard: &Dashboard) {
    let p = palette(dashboard.theme);
    f.render_widget(Block::default().style(Style::default().bg(p.bg).fg(p.fg)), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Greeting
            Constraint::Min(10),   // Habits + calendar
            Constraint::Length(3), // Progress
            Constraint::Length(3), // Help
        ].as_ref())
        .split(f.area());

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Hello, {}", dashboard.username),
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("\"{}\"", dashboard.quote),
            Style::default().fg(p.muted).add_modifier(Modifier::ITALIC),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title(dashboard.today.format("%A, %d %B %Y").to_string()))
    .wrap(Wrap { trim: true });
    f.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
        .split(chunks[1]);

    let rows: Vec<Row> = dashboard
        .habits
        .iter()
        .map(|h| {
            let (mark, style) = if h.done_today {
                ("[x]", Style::default().fg(p.success))
            } else {
                ("[ ]", Style::default().fg(p.fg))
            };
            Row::new(vec![Cell::from(mark), Cell::from(h.name.clone())]).style(style)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(4), Constraint::Min(20)])
        .header(Row::new(vec!["", "Habit"])
            .style(Style::default().fg(p.accent).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title("Today's Habits"))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(p.highlight))
        .highlight_symbol(">> ");
    f.render_stateful_widget(table, body[0], &mut app.state);

    f.render_widget(calendar_table(&dashboard.calendar, &p), body[1]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(p.success).bg(p.highlight))
        .percent(u16::from(dashboard.progress))
        .label(format!("{}% Completed", dashboard.progress));
    f.render_widget(gauge, chunks[2]);

    let help_text = match app.input_mode {
        InputMode::Normal => "q: Quit | Space: Toggle | a: Add | d: Del | r: Reset Day | t: Theme | o: Logout",
        InputMode::Adding => "Enter: Save | Esc: Cancel",
        InputMode::Confirm(_) => "y: Yes | n: No",
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(p.muted))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

/// Month grid, Monday first. Completed days use the success color.
fn calendar_table<'a>(view: &MonthView, p: &Palette) -> Table<'a> {
    let lead = view.first_day().weekday().num_days_from_monday() as usize;
    let mut cells: Vec<Cell> = (0..lead).map(|_| Cell::from("")).collect();
    for day in &view.days {
        let mut style = Style::default().fg(p.fg);
        if day.success {
            style = style.bg(p.success).fg(Color::Black);
        }
        if day.today {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        cells.push(Cell::from(format!("{:>2}", day.date.day())).style(style));
    }
    let mut rows = Vec::new();
    let mut iter = cells.into_iter().peekable();
    while iter.peek().is_some() {
        rows.push(Row::new(iter.by_ref().take(7).collect::<Vec<_>>()));
    }

    Table::new(rows, [Constraint::Length(3); 7])
        .header(Row::new(vec!["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"])
            .style(Style::default().fg(p.accent).add_modifier(Modifier::BOLD)))
        .block(Block::default().borders(Borders::ALL).title(view.label()))
}

fn popup(f: &mut Frame, title: &str, text: &str, color: Color) {
    let area = centered_rect(60, 3, f.area());
    f.render_widget(Clear, area);
    let widget = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));
    f.render_widget(widget, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
