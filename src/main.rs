use std::env;
use std::fs::File;
use std::io;
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use gitarbor::app::App;
use gitarbor::gateway::Gateway;
use gitarbor::highlight::Highlighter;
use gitarbor::{git, input, settings, ui};

const LOG_ENV: &str = "GITARBOR_LOG";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("gitarbor: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    init_tracing()?;

    let gateway = Gateway::new();
    if !git::git_available(&gateway) {
        anyhow::bail!(
            "could not run `{}`. Install git and make sure it is on your PATH.",
            gateway.program_display()
        );
    }

    let cwd = env::current_dir().context("failed to read the current directory")?;
    if !git::is_repository(&gateway, &cwd)? {
        anyhow::bail!(
            "`{}` is not a git repository. Run gitarbor from inside a working tree.",
            cwd.display()
        );
    }
    let repo_root = git::repo_root(&gateway, &cwd)?;
    tracing::info!(root = %repo_root.display(), "starting");

    let mut app = App::new(repo_root, gateway, settings::load());
    let highlighter = Highlighter::new();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = run_app(&mut terminal, &mut app, &highlighter);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    run_result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    highlighter: &Highlighter,
) -> Result<()> {
    let poll_timeout = Duration::from_millis(50);

    loop {
        app.tick();
        terminal.draw(|frame| {
            app.update_layout(frame.area());
            ui::render(frame, app, highlighter);
        })?;

        if event::poll(poll_timeout)? {
            let next_event = event::read()?;
            if !input::handle_event(app, next_event) {
                break;
            }
        }
    }

    Ok(())
}

/// File logging, only when `GITARBOR_LOG` names a path. The TUI owns stdout.
fn init_tracing() -> Result<()> {
    let Some(log_path) = env::var_os(LOG_ENV) else {
        return Ok(());
    };

    let file = File::options()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.to_string_lossy()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gitarbor=debug"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .try_init()
        .context("failed to install the tracing subscriber")?;

    Ok(())
}
