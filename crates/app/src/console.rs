//! Line-oriented terminal front end
//!
//! Plain text is sent as a public message. Lines starting with `/` are
//! commands; see [`HELP`].

use std::sync::Arc;

use buddy_core::{AddBuddy, AwayBanner, BuddyEntry, Message};
use buddy_net::Client;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Notify;
use tracing::{error, info, warn};

use crate::state::ClientState;

pub const HELP: &str = "\
Commands:
  <text>                   send a public message
  /to <name> <text>        send a private message
  /status <status> [note]  set your status (Online, Away, Invisible, ...)
  /add <name>              add a buddy to your roster
  /messages                show messages visible to you
  /roster                  show the roster from the last poll
  /help                    show this help
  /quit                    leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Whisper { to: String, text: String },
    Status { status: String, message: String },
    Add(String),
    Messages,
    Roster,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let Some(rest) = line.strip_prefix('/') else {
            return Some(Command::Say(line.to_string()));
        };

        let (name, args) = split_word(rest);
        let command = match name {
            "to" | "w" => {
                let (to, text) = split_word(args);
                Command::Whisper {
                    to: to.to_string(),
                    text: text.to_string(),
                }
            }
            "status" => {
                let (status, message) = split_word(args);
                Command::Status {
                    status: status.to_string(),
                    message: message.to_string(),
                }
            }
            "add" => Command::Add(args.to_string()),
            "messages" => Command::Messages,
            "roster" => Command::Roster,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        };
        Some(command)
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

pub fn render_entry(entry: &BuddyEntry) -> String {
    format!("  {:<16} [{}] {}", entry.name, entry.css_class(), entry.title())
}

pub fn render_message(message: &Message) -> String {
    if message.is_public() {
        format!(
            "[{}] {}: {}",
            message.format_timestamp(),
            message.sender,
            message.body
        )
    } else {
        format!(
            "[{}] {} (to {}): {}",
            message.format_timestamp(),
            message.sender,
            message.recipient,
            message.body
        )
    }
}

pub fn render_banner(banner: &AwayBanner) -> Option<String> {
    banner.text().map(|text| format!("*** Away: {} ***", text))
}

pub fn print_roster(entries: &[BuddyEntry]) {
    println!("Buddies:");
    for entry in entries {
        println!("{}", render_entry(entry));
    }
}

/// Read commands from stdin until `/quit` or end of input
pub async fn run(client: Client, state: Arc<ClientState>, refresh: Arc<Notify>) {
    println!("Signed on as {}. Type /help for commands.", state.screen_name());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "Failed to read input");
                break;
            }
        };

        let Some(command) = Command::parse(&line) else {
            continue;
        };
        if command == Command::Quit {
            break;
        }
        dispatch(&client, &state, &refresh, command).await;
    }

    info!("Leaving chat");
}

async fn dispatch(client: &Client, state: &ClientState, refresh: &Notify, command: Command) {
    match command {
        Command::Say(text) => send(client, state, &text, "").await,
        Command::Whisper { to, text } => {
            if to.is_empty() {
                println!("Usage: /to <name> <text>");
                return;
            }
            send(client, state, &text, &to).await;
        }
        Command::Status { status, message } => {
            if status.is_empty() {
                println!("Usage: /status <status> [note]");
                return;
            }
            if let Err(e) = state.select_status(&status, &message) {
                println!("{}", e);
                return;
            }
            if let Some(banner) = render_banner(&state.banner()) {
                println!("{}", banner);
            }

            match client.set_status(state.screen_name(), &status, &message).await {
                Ok(()) => refresh.notify_one(),
                Err(e) => error!(error = %e, "Failed to set status"),
            }
        }
        Command::Add(name) => match state.add_buddy(&name) {
            Ok(AddBuddy::Added) => {
                println!("Added {} to your buddies.", name.trim());
                refresh.notify_one();
            }
            Ok(AddBuddy::AlreadyPresent) => {
                println!("{} is already on your roster.", name.trim());
            }
            Err(e) => println!("{}", e),
        },
        Command::Messages => match client.list_messages(state.screen_name()).await {
            Ok(messages) if messages.is_empty() => println!("No messages yet."),
            Ok(messages) => {
                for message in &messages {
                    println!("{}", render_message(message));
                }
            }
            Err(e) => error!(error = %e, "Failed to load messages"),
        },
        Command::Roster => print_roster(&state.entries()),
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
        Command::Unknown(name) => {
            warn!(command = %name, "Unknown command");
            println!("Unknown command /{}. Type /help for commands.", name);
        }
    }
}

async fn send(client: &Client, state: &ClientState, text: &str, recipient: &str) {
    if state.screen_name().is_empty() || text.trim().is_empty() {
        error!("Screen name and message text are required");
        return;
    }

    if let Err(e) = client.send_message(state.screen_name(), text, recipient).await {
        error!(error = %e, "Failed to send message");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buddy_core::Presence;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_parse_plain_text_is_public_message() {
        assert_eq!(
            Command::parse("  hello there "),
            Some(Command::Say("hello there".into()))
        );
        assert_eq!(Command::parse("   "), None);
    }

    #[test]
    fn test_parse_whisper() {
        assert_eq!(
            Command::parse("/to bob see you at 5"),
            Some(Command::Whisper {
                to: "bob".into(),
                text: "see you at 5".into()
            })
        );
        assert_eq!(
            Command::parse("/to"),
            Some(Command::Whisper {
                to: String::new(),
                text: String::new()
            })
        );
    }

    #[test]
    fn test_parse_status_with_and_without_note() {
        assert_eq!(
            Command::parse("/status Away out to lunch"),
            Some(Command::Status {
                status: "Away".into(),
                message: "out to lunch".into()
            })
        );
        assert_eq!(
            Command::parse("/status Online"),
            Some(Command::Status {
                status: "Online".into(),
                message: String::new()
            })
        );
    }

    #[test]
    fn test_parse_other_commands() {
        assert_eq!(Command::parse("/add  Carol "), Some(Command::Add("Carol".into())));
        assert_eq!(Command::parse("/messages"), Some(Command::Messages));
        assert_eq!(Command::parse("/roster"), Some(Command::Roster));
        assert_eq!(Command::parse("/quit"), Some(Command::Quit));
        assert_eq!(
            Command::parse("/dance"),
            Some(Command::Unknown("dance".into()))
        );
    }

    #[test]
    fn test_render_entry() {
        let entry = BuddyEntry {
            name: "alice".into(),
            presence: Presence::Away,
            message: "brb".into(),
        };
        assert_eq!(render_entry(&entry), "  alice            [status-away] Away: brb");
    }

    #[test]
    fn test_render_messages() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 7, 0).unwrap();
        let mut message = Message {
            id: 1,
            sender: "A".into(),
            body: "hi".into(),
            created_at,
            recipient: String::new(),
        };
        assert_eq!(render_message(&message), "[09:07] A: hi");

        message.recipient = "B".into();
        assert_eq!(render_message(&message), "[09:07] A (to B): hi");
    }

    #[test]
    fn test_render_banner() {
        let mut banner = AwayBanner::default();
        assert_eq!(render_banner(&banner), None);

        banner.apply("Away", "");
        assert_eq!(
            render_banner(&banner).as_deref(),
            Some("*** Away: Be back soon! ***")
        );
    }
}
