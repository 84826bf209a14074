use std::io;
use std::time::Duration;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use miette::IntoDiagnostic;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use haidesk::config::AppConfig;
use haidesk::core::logging;
use haidesk::tui::app::AppState;
use haidesk::tui::services::Services;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging (file only — ratatui owns the terminal)
    let _log_guard = logging::init_tui();
    log::info!("HaiDesk v{} starting", haidesk::VERSION);

    let config = AppConfig::load();

    let (event_tx, event_rx) = mpsc::unbounded_channel();

    // Services come up before raw mode so startup failures report on a
    // normal screen with full miette diagnostics.
    let services = Services::init(&config, event_tx.clone()).await?;

    // Setup terminal
    enable_raw_mode().into_diagnostic()?;
    let mut stdout = io::stdout();
    if config.tui.mouse_enabled {
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).into_diagnostic()?;
    } else {
        execute!(stdout, EnterAlternateScreen).into_diagnostic()?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).into_diagnostic()?;

    // Run the app
    let tick_rate = Duration::from_millis(config.tui.tick_rate_ms);
    let mut app = AppState::new(event_rx, event_tx, services);
    let result = app.run(&mut terminal, tick_rate).await;

    // Restore terminal
    disable_raw_mode().into_diagnostic()?;
    if config.tui.mouse_enabled {
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .into_diagnostic()?;
    } else {
        execute!(terminal.backend_mut(), LeaveAlternateScreen).into_diagnostic()?;
    }
    terminal.show_cursor().into_diagnostic()?;

    if let Err(e) = result {
        logging::print_error(&format!("Console exited with an error: {e}"));
        std::process::exit(1);
    }

    log::info!("HaiDesk v{} shut down cleanly", haidesk::VERSION);
    Ok(())
}
