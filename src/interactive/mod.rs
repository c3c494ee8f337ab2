//! Interactive play mode
//!
//! A ratatui front end that hosts the live solver: every move schedules a
//! fresh analysis of the new position.

mod app;
mod rendering;

pub use app::{App, Message, MessageStyle, Status, run_tui};
