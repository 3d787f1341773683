//! `minidemo` - terminal song list and player.
//!
//! Usage: `minidemo [SONG_DIR]`

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use minidemo::app::App;
use minidemo::config::{expand_path, Settings, SettingsOverrides};
use minidemo::error::Result;
use minidemo::ui;
use ratatui::prelude::*;
use std::{io, panic, path::Path, time::Duration};
use tracing_subscriber::EnvFilter;

// Helper function to ensure the terminal is cleaned up on exit
fn cleanup_terminal<B: Backend + std::io::Write>(terminal: &mut Terminal<B>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Send logs to a file so they do not draw over the UI.
///
/// Runs before raw mode, so failures are reported on stderr and the player
/// starts without a log.
fn init_logging() {
    let Some(dir) = dirs::data_dir().map(|d| d.join("minidemo")) else {
        eprintln!("Logging disabled: no data directory for this platform");
        return;
    };
    let file = match open_log_file(&dir) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Logging disabled: {e}");
            return;
        }
    };

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .try_init()
    {
        eprintln!("Logging disabled: {e}");
    }
}

/// Create `dir` if needed and truncate `minidemo.log` inside it.
fn open_log_file(dir: &Path) -> io::Result<fs_err::File> {
    fs_err::create_dir_all(dir)?;
    fs_err::File::create(dir.join("minidemo.log"))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let mut settings = Settings::load()?;
    if let Some(dir) = std::env::args().nth(1) {
        settings = settings.with_overrides(SettingsOverrides {
            base_path: Some(expand_path(&dir)),
            ..SettingsOverrides::default()
        });
    }
    tracing::info!("Using song directory {}", settings.base_path.display());

    // Setup better panic handling that cleans up terminal first
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(settings);
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    if let Err(e) = cleanup_terminal(&mut terminal) {
        eprintln!("Error cleaning up terminal: {e:?}");
    }

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        app.handle_updates(); // Handle async updates first
        app.tick();

        terminal.draw(|f| ui::draw(f, &mut app))?;

        if event::poll(Duration::from_millis(50))? {
            if let event::Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        } else {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        if app.should_quit() {
            break;
        }
    }
    Ok(())
}
