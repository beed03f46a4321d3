//! I/O layer for Parlor
//!
//! Everything the client needs to talk to the outside world, kept separate
//! from the pure state machine in `parlor-app`:
//!
//! - [`ApiClient`]: REST calls for rooms and history (reqwest)
//! - [`transport`]: the real-time socket.io channel (rust_socketio)
//! - [`PreferenceStore`]: the local preferences file

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod api;
pub mod error;
pub mod store;
pub mod transport;

pub use api::ApiClient;
pub use error::{ClientError, Result};
pub use store::PreferenceStore;
pub use transport::{ConnectedChannel, socket_url};
