//! Terminal lifecycle management.
//!
//! Terminal state is restored on:
//! - Normal exit (via `TuiRuntime`'s Drop)
//! - Panic (via the installed hook)

use std::io::{self, Stdout};
use std::panic;

use anyhow::{Context, Result};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

/// Enables raw mode, enters the alternate screen and creates the terminal.
///
/// Call `install_panic_hook()` first so a panic restores the terminal.
///
/// # Errors
/// Returns an error if the terminal cannot be prepared.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Enables mouse capture so the search toggle can be clicked.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn enable_input_features() -> Result<()> {
    execute!(io::stdout(), EnableMouseCapture).context("Failed to enable mouse capture")?;
    Ok(())
}

/// Disables what `enable_input_features()` enabled.
///
/// # Errors
/// Returns an error if the operation fails.
pub fn disable_input_features() -> Result<()> {
    execute!(io::stdout(), DisableMouseCapture).context("Failed to disable mouse capture")?;
    Ok(())
}

/// Restores terminal state. Idempotent.
///
/// # Errors
/// Returns an error if the alternate screen or raw mode cannot be left.
pub fn restore_terminal() -> Result<()> {
    // Mouse capture must go before raw mode.
    let _ = execute!(io::stdout(), DisableMouseCapture);
    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to leave alternate screen")?;
    disable_raw_mode().context("Failed to disable raw mode")?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before printing the panic.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}
