//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use parlor_proto::ClientEvent;

use crate::Preferences;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Open the real-time channel.
    Connect,

    /// Send an event over the real-time channel.
    Emit(ClientEvent),

    /// Start a REST call. The result comes back as
    /// [`crate::AppEvent::Response`].
    Request(ApiRequest),

    /// Write preferences to local storage.
    Persist(Preferences),
}

/// REST calls the App can ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    /// `GET /groups`.
    Groups,

    /// `POST /groups`.
    CreateGroup {
        /// Requested room name.
        name: String,
    },

    /// `GET /rooms/{room}/messages`.
    RoomHistory {
        /// Room to load.
        room: String,
        /// Focus generation that issued the request.
        generation: u64,
    },

    /// `GET /dm/{peer}/messages?me={me}`.
    PrivateHistory {
        /// Peer user id.
        peer: String,
        /// Our own user id.
        me: String,
        /// Focus generation that issued the request.
        generation: u64,
    },
}
