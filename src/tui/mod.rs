pub mod app;
pub mod ui;

use std::{error::Error, io, time::Duration};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use app::{App, InputMode, Screen};
use ui::ui;
use crate::session::Tracker;

pub fn run_tui(tracker: &mut Tracker) -> Result<(), Box<dyn Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(tracker);

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if !event::poll(Duration::from_secs(60))? {
            app.refresh();
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            handle_key(app, key);
            if app.should_quit {
                return Ok(());
            }
        }
    }
}

/// Routes one key press to the current screen and mode.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if app.notice.is_some() {
        app.notice = None;
        return;
    }
    match app.screen {
        Screen::Auth => match key.code {
            KeyCode::Esc => app.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab => app.switch_auth_field(),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => app.switch_auth_mode(),
            KeyCode::Enter => app.submit_auth(),
            KeyCode::Char(c) => app.auth_input().push(c),
            KeyCode::Backspace => {
                app.auth_input().pop();
            }
            _ => {}
        },
        Screen::Dashboard => match app.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected(),
                KeyCode::Char('a') => app.start_add(),
                KeyCode::Char('d') | KeyCode::Delete => app.ask_delete(),
                KeyCode::Char('r') => app.ask_reset(),
                KeyCode::Char('t') => app.toggle_theme(),
                KeyCode::Char('o') => app.logout(),
                _ => {}
            },
            InputMode::Adding => match key.code {
                KeyCode::Enter => app.submit_add(),
                KeyCode::Esc => {
                    app.input_mode = InputMode::Normal;
                    app.input_buffer.clear();
                }
                KeyCode::Char(c) => {
                    app.input_buffer.push(c);
                }
                KeyCode::Backspace => {
                    app.input_buffer.pop();
                }
                _ => {}
            },
            InputMode::Confirm(_) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => app.answer(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.answer(false),
                _ => {}
            },
        },
    }
}
