//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: reconciliation state machine
//! - [`Driver`]: platform-specific I/O
//!
//! One cycle handles at most one user input, then ticks the clock, then
//! drains every inbound event that is ready. Ticking first means inbound
//! events are stamped with the time they were received, not the time of the
//! previous cycle.

use parlor_proto::{ServerEvent, events::ErrorPayload};

use crate::{App, AppAction, AppEvent, Driver};

/// Generic runtime that orchestrates App and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
pub struct Runtime<D>
where
    D: Driver,
{
    driver: D,
    app: App,
}

impl<D> Runtime<D>
where
    D: Driver,
{
    /// Create a new runtime with the given driver and initial App.
    pub fn new(driver: D, app: App) -> Self {
        Self { driver, app }
    }

    /// Run the main event loop until the App asks to quit.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an input or render error.
    /// Channel and storage failures are fed back into the App instead.
    pub async fn run(mut self) -> Result<(), D::Error> {
        let mut should_quit = self.start().await?;
        while !should_quit {
            should_quit = self.process_cycle().await?;
        }

        self.driver.stop();
        Ok(())
    }

    /// Render once and issue the App's initial loads.
    ///
    /// Returns `true` if the application should quit.
    pub async fn start(&mut self) -> Result<bool, D::Error> {
        self.driver.render(&self.app)?;
        let actions = self.app.start();
        self.process_actions(actions).await
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    pub async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        let actions = self.driver.poll_event(&mut self.app).await?;
        if !actions.is_empty() && self.process_actions(actions).await? {
            return Ok(true);
        }

        let now = self.driver.now();
        let actions = self.app.handle(AppEvent::Tick { now });
        if self.process_actions(actions).await? {
            return Ok(true);
        }

        while let Some(event) = self.driver.recv_event().await {
            let actions = self.app.handle(event);
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),
                    AppAction::Connect => {
                        if let Err(e) = self.driver.connect().await {
                            tracing::warn!("Failed to start connection: {e}");
                            let error = ErrorPayload { message: Some(e.to_string()) };
                            let event = AppEvent::Server(ServerEvent::ConnectError(error));
                            pending_actions.extend(self.app.handle(event));
                        }
                    },
                    AppAction::Emit(event) => {
                        let name = event.name();
                        // A closed channel reports `disconnect` on its own.
                        if let Err(e) = self.driver.emit(event).await {
                            tracing::warn!("Failed to emit {name}: {e}");
                        }
                    },
                    AppAction::Request(request) => self.driver.request(request),
                    AppAction::Persist(prefs) => {
                        if let Err(e) = self.driver.persist(&prefs) {
                            tracing::warn!("Failed to save preferences: {e}");
                        }
                    },
                }
            }
        }
        Ok(false)
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Get a reference to the Driver
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
