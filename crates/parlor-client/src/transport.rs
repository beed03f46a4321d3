//! socket.io transport for the real-time channel.
//!
//! Provides [`ConnectedChannel`], which owns a background task holding the
//! socket.io client. This is a thin layer that turns named socket.io events
//! into [`ServerEvent`]s and back; session logic stays in the sans-IO `App`.
//!
//! The chat server mounts socket.io at `/socket.io/` and speaks the polling
//! transport, so that is what the client asks for. Reconnects are left to
//! the `App`, which knows when a rejoin is needed.
//!
//! The socket lifecycle is reported in-band: the task emits
//! [`ServerEvent::Connect`] once the handshake succeeds,
//! [`ServerEvent::ConnectError`] if it fails, and [`ServerEvent::Disconnect`]
//! when an open socket goes away. Lifecycle names arriving as server events
//! are ignored.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use futures::{FutureExt, future::BoxFuture};
use parlor_proto::{ClientEvent, ServerEvent, events::ErrorPayload};
use reqwest::Url;
use rust_socketio::{
    Event, Payload, TransportType,
    asynchronous::{Client, ClientBuilder},
};
use serde_json::Value;
use tokio::sync::{Notify, mpsc};

use crate::error::{ClientError, Result};

/// Outbound queue depth before `send` waits.
const OUTBOUND_CAPACITY: usize = 64;

/// Path the server mounts socket.io under.
const SOCKET_PATH: &str = "socket.io";

/// socket.io endpoint for an API base: `/socket.io/` is appended to the path.
pub fn socket_url(api_base: &Url) -> Result<Url> {
    match api_base.scheme() {
        "http" | "https" => {},
        other => return Err(ClientError::InvalidUrl(format!("unsupported scheme {other}"))),
    }
    let mut url = api_base.clone();
    url.path_segments_mut()
        .map_err(|()| ClientError::InvalidUrl(api_base.to_string()))?
        .pop_if_empty()
        .push(SOCKET_PATH)
        .push("");
    url.set_query(None);
    Ok(url)
}

/// Handle to a channel task.
///
/// Events are sent through [`ConnectedChannel::send`]; inbound events go to
/// the sender passed to [`connect`].
pub struct ConnectedChannel {
    to_server: mpsc::Sender<ClientEvent>,
    stopped: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
}

impl ConnectedChannel {
    /// Queue an event for the server.
    pub async fn send(&self, event: ClientEvent) -> Result<()> {
        self.to_server.send(event).await.map_err(|_| ClientError::ChannelClosed)
    }

    /// Stop the channel without reporting a disconnect.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        self.shutdown.notify_one();
    }
}

/// Open the channel at `url` in the background.
///
/// `url` is the socket.io endpoint, see [`socket_url`]. Returns immediately.
/// The outcome of the handshake and every later push arrive on `events`.
pub fn connect(url: Url, events: mpsc::UnboundedSender<ServerEvent>) -> ConnectedChannel {
    let (to_server_tx, to_server_rx) = mpsc::channel(OUTBOUND_CAPACITY);
    let stopped = Arc::new(AtomicBool::new(false));
    let shutdown = Arc::new(Notify::new());
    let inbound = Inbound { events, stopped: Arc::clone(&stopped) };

    tokio::spawn(run_channel(url, to_server_rx, inbound, Arc::clone(&shutdown)));

    ConnectedChannel { to_server: to_server_tx, stopped, shutdown }
}

/// Inbound side shared with the socket.io callbacks.
#[derive(Clone)]
struct Inbound {
    events: mpsc::UnboundedSender<ServerEvent>,
    stopped: Arc<AtomicBool>,
}

impl Inbound {
    fn forward(&self, event: ServerEvent) {
        // A stopped channel has been replaced; its late callbacks must not
        // reach the new session.
        if !self.stopped.load(Ordering::Acquire) {
            let _ = self.events.send(event);
        }
    }

    /// Callback for one lifecycle event of the socket.io client.
    fn on(self, event: Event) -> impl FnMut(Payload, Client) -> BoxFuture<'static, ()> + Send + Sync + 'static {
        move |payload, _client| {
            if let Some(decoded) = decode(&event, payload) {
                self.forward(decoded);
            }
            async {}.boxed()
        }
    }
}

/// Translate one socket.io callback into a server event.
///
/// Returns `None` for anything the `App` does not consume.
fn decode(event: &Event, payload: Payload) -> Option<ServerEvent> {
    if matches!(event, Event::Close) {
        return Some(ServerEvent::Disconnect);
    }

    let data = match payload {
        Payload::Text(values) => values.into_iter().next().unwrap_or(Value::Null),
        _ => {
            tracing::debug!(?event, "dropping non-JSON payload");
            return None;
        },
    };

    match event {
        Event::Custom(name) => match ServerEvent::from_parts(name, data) {
            Ok(ServerEvent::Connect | ServerEvent::Disconnect | ServerEvent::ConnectError(_)) => {
                tracing::debug!("ignoring lifecycle event from the server");
                None
            },
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::debug!("dropping event: {e}");
                None
            },
        },
        // The server's `error` event shares a name with the client's own
        // failure reports. Only the server sends an object.
        Event::Error => match data {
            Value::Object(_) => match ServerEvent::from_parts("error", data) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    tracing::debug!("dropping error event: {e}");
                    None
                },
            },
            other => {
                tracing::warn!("channel error: {other}");
                None
            },
        },
        _ => None,
    }
}

/// Run the channel, bridging between the queue and the socket.io client.
async fn run_channel(
    url: Url,
    mut to_server: mpsc::Receiver<ClientEvent>,
    inbound: Inbound,
    shutdown: Arc<Notify>,
) {
    let on_any = inbound.clone();
    let builder = ClientBuilder::new(url.as_str())
        .transport_type(TransportType::Polling)
        .reconnect(false)
        .on(Event::Error, inbound.clone().on(Event::Error))
        .on(Event::Close, inbound.clone().on(Event::Close))
        .on_any(move |event, payload, _client| {
            // Lifecycle events have their own callbacks above.
            if matches!(event, Event::Custom(_))
                && let Some(decoded) = decode(&event, payload)
            {
                on_any.forward(decoded);
            }
            async {}.boxed()
        });

    let client = tokio::select! {
        () = shutdown.notified() => return,
        result = builder.connect() => match result {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(%url, "channel connect failed: {e}");
                inbound.forward(ServerEvent::ConnectError(ErrorPayload { message: Some(e.to_string()) }));
                return;
            },
        },
    };

    tracing::info!(%url, "channel open");
    inbound.forward(ServerEvent::Connect);

    loop {
        tokio::select! {
            () = shutdown.notified() => break,
            outgoing = to_server.recv() => {
                // Handle dropped: close politely.
                let Some(event) = outgoing else { break };
                if let Err(e) = emit(&client, event).await {
                    tracing::warn!("send failed: {e}");
                }
            }
        }
    }

    if let Err(e) = client.disconnect().await {
        tracing::debug!("disconnect failed: {e}");
    }
    tracing::info!(%url, "channel closed");
}

async fn emit(client: &Client, event: ClientEvent) -> Result<()> {
    let (name, data) = event.into_parts()?;
    client.emit(name, data).await?;
    Ok(())
}
