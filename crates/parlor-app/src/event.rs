//! Application input events.
//!
//! This module defines [`AppEvent`], the set of asynchronous inputs that drive
//! the [`crate::App`] state machine. User commands are plain `App` method
//! calls instead, since they originate synchronously from the front end.
//!
//! Events come from three sources:
//! - The real-time channel ([`ServerEvent`]).
//! - Completed REST calls ([`ApiResponse`]).
//! - The clock ([`AppEvent::Tick`]).

use std::time::Instant;

use parlor_proto::{ChatMessage, Group, ServerEvent};

use crate::Focus;

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick carrying the current time.
    Tick {
        /// Current instant.
        now: Instant,
    },

    /// Event pushed over the real-time channel.
    Server(ServerEvent),

    /// A REST call finished.
    Response(ApiResponse),
}

impl From<ServerEvent> for AppEvent {
    fn from(event: ServerEvent) -> Self {
        Self::Server(event)
    }
}

impl From<ApiResponse> for AppEvent {
    fn from(response: ApiResponse) -> Self {
        Self::Response(response)
    }
}

/// Outcome of an [`crate::ApiRequest`].
///
/// Failures carry a human-readable message. For `CreateGroup` it is the
/// server's response body.
#[derive(Debug, Clone)]
pub enum ApiResponse {
    /// Result of `GET /groups`.
    Groups(Result<Vec<Group>, String>),

    /// Result of `POST /groups`.
    GroupCreated(Result<Group, String>),

    /// Result of a room or private history fetch.
    History {
        /// Room or peer the history belongs to.
        target: Focus,
        /// Generation carried by the originating request.
        generation: u64,
        /// Fetched messages, oldest first.
        result: Result<Vec<ChatMessage>, String>,
    },
}
