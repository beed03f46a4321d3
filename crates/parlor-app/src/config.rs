//! Timing and default-room configuration for the state machine.

use std::time::Duration;

use parlor_proto::DEFAULT_ROOM;

/// How long a join may stay unacknowledged before it is reported as failed.
pub const DEFAULT_JOIN_TIMEOUT: Duration = Duration::from_secs(10);

/// How long a typing indicator stays visible without a refresh.
pub const DEFAULT_TYPING_TTL: Duration = Duration::from_millis(3000);

/// Minimum spacing between our own outbound typing notices.
pub const DEFAULT_TYPING_THROTTLE: Duration = Duration::from_secs(1);

/// Delay between reconnect attempts after the channel drops.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// State machine configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Room focused at startup.
    pub default_room: String,
    /// Join acknowledgement timeout.
    pub join_timeout: Duration,
    /// Typing indicator lifetime.
    pub typing_ttl: Duration,
    /// Outbound typing notice spacing.
    pub typing_throttle: Duration,
    /// Reconnect spacing.
    pub reconnect_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_room: DEFAULT_ROOM.to_string(),
            join_timeout: DEFAULT_JOIN_TIMEOUT,
            typing_ttl: DEFAULT_TYPING_TTL,
            typing_throttle: DEFAULT_TYPING_THROTTLE,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}
