//! Events carried from the terminal-reading thread into the TUI's main
//! loop (`Tui::await_event`). Lives in the library so both the `jdb`
//! binary and `tui::mod` can name the same type without one owning the
//! other's definition.

use ratatui::crossterm::event::KeyEvent;

pub enum JdbEvent {
    InferiorLogging(String),
    TerminalKey(KeyEvent),
    TerminalResize,
}
