//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide
//! platform-specific I/O, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::{future::Future, time::Instant};

use parlor_proto::ClientEvent;

use crate::{ApiRequest, App, AppAction, AppEvent, Preferences};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in the terminal client and in tests.
///
/// # Implementations
///
/// - **TUI**: crossterm for input, rust_socketio for the channel, reqwest
///   for REST calls
/// - **Tests**: scripted inputs and an in-memory fake server
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next user input and apply it to `app`.
    ///
    /// Returns the actions produced, or an empty list when the wait timed
    /// out so the runtime can tick.
    fn poll_event(
        &mut self,
        app: &mut App,
    ) -> impl Future<Output = Result<Vec<AppAction>, Self::Error>> + Send;

    /// Next inbound event: a server push or a finished REST call.
    ///
    /// Returns `None` if nothing is ready. Never blocks.
    fn recv_event(&mut self) -> impl Future<Output = Option<AppEvent>> + Send;

    /// Open the real-time channel.
    ///
    /// Success only means the attempt started. The outcome arrives later as
    /// `connect` or `connect_error` through [`Driver::recv_event`].
    ///
    /// # Errors
    ///
    /// Returns an error if the attempt could not even be started.
    fn connect(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Send an event over the real-time channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel is closed.
    fn emit(&mut self, event: ClientEvent) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Start a REST call. Its result arrives through [`Driver::recv_event`].
    fn request(&mut self, request: ApiRequest);

    /// Write preferences to local storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn persist(&mut self, prefs: &Preferences) -> Result<(), Self::Error>;

    /// Current time instant.
    fn now(&self) -> Instant;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Stop the connection and clean up resources.
    fn stop(&mut self);
}
