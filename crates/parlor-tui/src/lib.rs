//! Terminal UI for Parlor
//!
//! A thin shell over [`parlor_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`parlor_app::Runtime`]
//!
//! This crate handles key input, slash commands and terminal rendering.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
pub mod input;
pub mod terminal;
pub mod ui;

pub use input::{InputState, KeyInput};
pub use parlor_app::{App, AppAction, AppConfig, AppEvent, Driver, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
