//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. The real-time channel runs on
//! rust_socketio and REST calls on reqwest, both through `parlor-client`.

use std::{
    io::{self, Stdout, stdout},
    time::{Duration, Instant},
};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use parlor_app::{ApiRequest, ApiResponse, App, AppAction, AppEvent, Driver, Focus, Preferences};
use parlor_client::{ApiClient, ClientError, ConnectedChannel, PreferenceStore, socket_url, transport};
use parlor_proto::{ClientEvent, ServerEvent};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::{InputState, KeyInput, ui};

/// How long to wait for a key before letting the runtime tick.
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Shown when a room cannot be created and the server gave no reason.
const CREATE_GROUP_FALLBACK: &str = "Unable to create group";

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Channel, REST or preference file error.
    #[error("client error: {0}")]
    Client(#[from] ClientError),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm), rendering (ratatui), the real-time
/// channel and REST calls. Owns the input state for text editing.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    api: ApiClient,
    store: PreferenceStore,
    channel: Option<ConnectedChannel>,
    server_tx: mpsc::UnboundedSender<ServerEvent>,
    server_rx: mpsc::UnboundedReceiver<ServerEvent>,
    response_tx: mpsc::UnboundedSender<ApiResponse>,
    response_rx: mpsc::UnboundedReceiver<ApiResponse>,
    input_state: InputState,
    /// Set until the first poll, which loads the draft and runs `auto_join`.
    first_poll: bool,
    auto_join: Option<String>,
}

impl TerminalDriver {
    /// Create a new terminal driver.
    ///
    /// Switches the terminal to raw mode and the alternate screen. If
    /// `auto_join` is set, that name is joined on the first poll.
    pub fn new(api: ApiClient, store: PreferenceStore, auto_join: Option<String>) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        let event_stream = EventStream::new();
        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (response_tx, response_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            event_stream,
            api,
            store,
            channel: None,
            server_tx,
            server_rx,
            response_tx,
            response_rx,
            input_state: InputState::new(),
            first_poll: true,
            auto_join,
        })
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Tab => Some(KeyInput::Tab),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }
}

/// Run one REST call and wrap its outcome for the App.
async fn perform(api: ApiClient, request: ApiRequest) -> ApiResponse {
    match request {
        ApiRequest::Groups => ApiResponse::Groups(api.list_groups().await.map_err(|e| e.to_string())),
        ApiRequest::CreateGroup { name } => ApiResponse::GroupCreated(
            api.create_group(&name).await.map_err(|e| e.user_message(CREATE_GROUP_FALLBACK)),
        ),
        ApiRequest::RoomHistory { room, generation } => {
            let result = api.room_history(&room).await.map_err(|e| e.to_string());
            ApiResponse::History { target: Focus::Room(room), generation, result }
        },
        ApiRequest::PrivateHistory { peer, me, generation } => {
            let result = api.private_history(&peer, &me).await.map_err(|e| e.to_string());
            ApiResponse::History { target: Focus::Peer(peer), generation, result }
        },
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn poll_event(&mut self, app: &mut App) -> Result<Vec<AppAction>, Self::Error> {
        if self.first_poll {
            self.first_poll = false;
            self.input_state.load_draft(app);
            let mut actions = vec![AppAction::Render];
            if let Some(name) = self.auto_join.take() {
                actions.extend(app.join(&name));
            }
            return Ok(actions);
        }

        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                        match Self::convert_key(key_event.code) {
                            Some(key_input) => Ok(self.input_state.handle_key(key_input, app)),
                            None => Ok(vec![]),
                        }
                    },
                    Some(Ok(Event::Resize(..))) => Ok(vec![AppAction::Render]),
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    _ => Ok(vec![]),
                }
            }

            // Tick timeout
            () = tokio::time::sleep(INPUT_POLL_INTERVAL) => Ok(vec![]),
        }
    }

    async fn recv_event(&mut self) -> Option<AppEvent> {
        if let Ok(event) = self.server_rx.try_recv() {
            return Some(AppEvent::Server(event));
        }
        self.response_rx.try_recv().ok().map(AppEvent::Response)
    }

    async fn connect(&mut self) -> Result<(), Self::Error> {
        if let Some(old) = self.channel.take() {
            old.stop();
        }
        let url = socket_url(self.api.base())?;
        tracing::info!(%url, "connecting");
        self.channel = Some(transport::connect(url, self.server_tx.clone()));
        Ok(())
    }

    async fn emit(&mut self, event: ClientEvent) -> Result<(), Self::Error> {
        let channel = self.channel.as_ref().ok_or(ClientError::ChannelClosed)?;
        channel.send(event).await?;
        Ok(())
    }

    fn request(&mut self, request: ApiRequest) {
        let api = self.api.clone();
        let responses = self.response_tx.clone();
        tokio::spawn(async move {
            // The receiver only goes away on shutdown.
            let _ = responses.send(perform(api, request).await);
        });
    }

    fn persist(&mut self, prefs: &Preferences) -> Result<(), Self::Error> {
        self.store.save(prefs)?;
        Ok(())
    }

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| {
            ui::render(frame, app, &self.input_state);
        })?;
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(channel) = self.channel.take() {
            channel.stop();
        }
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
