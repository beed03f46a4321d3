//! Slash command parsing.
//!
//! Anything not starting with `/` is a message for the focused room or
//! thread. Parsing is pure: resolving names against presence and calling
//! into the App happens in [`crate::input`].

/// A parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/join <name>`: register the display name and join the focused room.
    Join {
        /// Display name.
        name: String,
    },
    /// `/room <name>`: focus a room, joining it if needed.
    Room {
        /// Room name.
        name: String,
    },
    /// `/dm <user>`: focus a private thread by display name or user id.
    Dm {
        /// Display name or user id.
        user: String,
    },
    /// `/create <name>`: create a room on the server.
    Create {
        /// Room name.
        name: String,
    },
    /// `/groups`: reload the room list.
    Groups,
    /// `/theme`: switch between dark and light.
    Theme,
    /// `/sidebar`: show or hide the sidebar.
    Sidebar,
    /// `/quit`.
    Quit,
    /// Plain text to send.
    Message {
        /// Message text.
        content: String,
    },
    /// Unrecognized command.
    Unknown {
        /// The whole input line.
        input: String,
    },
    /// Known command with bad arguments.
    InvalidArgs {
        /// Command name without the slash.
        command: String,
        /// What was wrong.
        error: String,
    },
}

/// Parse one line of input.
pub fn parse(input: &str) -> Command {
    let Some(rest) = input.strip_prefix('/') else {
        return Command::Message { content: input.to_string() };
    };

    let (command, args) = match rest.split_once(char::is_whitespace) {
        Some((command, args)) => (command, args.trim()),
        None => (rest, ""),
    };

    match command {
        "join" => with_arg(command, args, "missing display name", |name| Command::Join { name }),
        "room" => with_arg(command, args, "missing room name", |name| Command::Room { name }),
        "dm" => with_arg(command, args, "missing user", |user| Command::Dm { user }),
        "create" => with_arg(command, args, "missing room name", |name| Command::Create { name }),
        "groups" => Command::Groups,
        "theme" => Command::Theme,
        "sidebar" => Command::Sidebar,
        "quit" | "q" => Command::Quit,
        _ => Command::Unknown { input: input.to_string() },
    }
}

fn with_arg(command: &str, args: &str, missing: &str, build: impl FnOnce(String) -> Command) -> Command {
    if args.is_empty() {
        Command::InvalidArgs { command: command.to_string(), error: missing.to_string() }
    } else {
        build(args.to_string())
    }
}
