//! # Habitust
//!
//! A local habit tracker for the terminal. Sign up, tick off your habits each
//! day, and watch the month fill up with days where you completed all of them.
//!
//! ## Features
//!
//! *   **Accounts**: several people can share one machine; each account keeps its own habits, history, and theme.
//! *   **Daily check-off**: toggle a habit for today (or any date) and see today's progress.
//! *   **Calendar**: a month grid highlighting every day on which all habits were done.
//! *   **Dual Interface**:
//!     *   **CLI**: Scriptable and quick for single commands.
//!     *   **TUI**: Interactive dashboard with a login screen.
//! *   **Data Persistence**: Stored in standard XDG data directories (JSON format).
//!
//! ## Usage
//!
//! ```bash
//! habitust signup alice
//! habitust list
//! habitust toggle 3
//! habitust add "Stretch"
//! habitust calendar --month 2026-09
//! habitust logout
//! ```
//!
//! Run without arguments to open the TUI.
//!
//! #### TUI Key Bindings
//!
//! **Login screen**
//! *   `Tab`: Switch between username and password
//! *   `Ctrl+S`: Switch between Login and Sign up
//! *   `Enter`: Submit
//! *   `Esc`: Quit
//!
//! **Dashboard**
//! *   `j`/`k`: Move selection
//! *   `Space`: Toggle selected habit for today
//! *   `a`: Add habit
//! *   `d`: Delete selected habit (asks first)
//! *   `r`: Reset today (asks first)
//! *   `t`: Toggle light/dark theme
//! *   `o`: Log out
//! *   `q`: Quit
//!
//! ## Data Storage
//!
//! `users.json` and `current_user.json` live in your local data directory:
//! *   Linux: `~/.local/share/habitust/`
//! *   macOS: `~/Library/Application Support/habitust/`
//! *   Windows: `%APPDATA%\habitust\`
//!
//! Override the directory with `HABITS_DB`, and the password hashing cost with
//! `HABITS_PBKDF2_ITERATIONS`. Logging goes to stderr and follows `RUST_LOG`.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use tracing_subscriber::{fmt, EnvFilter};
use habitust::commands::*;
use habitust::tui::run_tui;
use habitust::{Config, HabitResult, Tracker};

#[derive(Parser)]
#[command(name = "habitust")]
#[command(about = "Simple terminal habit tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log into it
    Signup {
        username: String,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log into an existing account
    Login {
        username: String,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log out of the current account
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Add a new habit
    Add {
        /// Habit name (quoted if it has spaces)
        name: String,
    },
    /// List habits with today's progress
    List,
    /// Mark a habit done / not done
    Toggle {
        id: u64,
        /// Date in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Remove a habit
    Delete {
        id: u64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Clear a day's completions for every habit
    Reset {
        /// Date in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Toggle light/dark theme
    Theme,
    /// Show the month calendar of fully completed days
    Calendar {
        /// Month in YYYY-MM (defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Print a motivational quote
    Quote,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

fn run(command: Option<Commands>, tracker: &mut Tracker) -> HabitResult<()> {
    match command {
        Some(Commands::Signup { username, password }) => cmd_signup(tracker, username, password, false),
        Some(Commands::Login { username, password }) => cmd_login(tracker, username, password, false),
        Some(Commands::Logout) => cmd_logout(tracker, false),
        Some(Commands::Whoami) => {
            cmd_whoami(tracker);
            Ok(())
        }
        Some(Commands::Add { name }) => cmd_add(tracker, name, false),
        Some(Commands::List) => cmd_list(tracker),
        Some(Commands::Toggle { id, date }) => cmd_toggle(tracker, id, date, false),
        Some(Commands::Delete { id, force }) => cmd_delete(tracker, id, force, false),
        Some(Commands::Reset { date, force }) => cmd_reset(tracker, date, force, false),
        Some(Commands::Theme) => cmd_theme(tracker, false),
        Some(Commands::Calendar { month }) => cmd_calendar(tracker, month),
        Some(Commands::Quote) => {
            cmd_quote(tracker);
            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return Ok(());
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "habitust", &mut io::stdout());
            Ok(())
        }
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui(tracker) {
                eprintln!("Error running TUI: {}", e);
            }
            Ok(())
        }
    }
}

fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut tracker = Tracker::open(Config::from_env());
    if let Err(e) = run(cli.command, &mut tracker) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
