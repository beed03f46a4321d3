//! Application layer for Parlor
//!
//! Pure state machine and generic runtime for the chat client. All session
//! state lives in one owned [`App`]; every input (server push, REST
//! response, user command, clock tick) is an [`AppEvent`] or an `App` method
//! call, and every side effect is an [`AppAction`] for the runtime to carry
//! out. Nothing in this crate performs I/O.
//!
//! # Components
//!
//! - [`App`]: reconciliation state (rooms, threads, presence, typing, unread)
//! - [`EventSink`]: one handler per inbound channel event, implemented by `App`
//! - [`TypingTracker`]: per-(room, user) typing expiry
//! - [`Driver`]: trait for platform-specific I/O
//! - [`Runtime`]: generic orchestration loop using a `Driver`

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod config;
mod driver;
mod event;
mod prefs;
mod runtime;
mod sink;
mod state;
mod typing;

pub use action::{ApiRequest, AppAction};
pub use app::{App, JOIN_TIMEOUT_MESSAGE};
pub use config::AppConfig;
pub use driver::Driver;
pub use event::{ApiResponse, AppEvent};
pub use prefs::{Preferences, Theme};
pub use runtime::Runtime;
pub use sink::{EventSink, dispatch};
pub use state::{ConnectionState, Focus, MessageBuffer, RoomState, ThreadState};
pub use typing::TypingTracker;
