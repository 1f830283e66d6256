use std::str::FromStr;

use crate::error::KukanError;
use crate::events::Room;

use strum::{EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Commands that can be invoked by starting a message with a leading slash.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SlashCommand {
    /// Empty the conversation
    Clear,
    /// Collapse to the compact composer
    Minimize,
    /// Restore the full widget
    Expand,
    /// Select a room
    Room,
    /// Show help
    Help,
    /// Exit the application
    Quit,
}

pub fn command_entries() -> Vec<CommandEntry> {
    SlashCommand::iter()
        .map(|command| CommandEntry {
            keyword: command.command(),
            description: command.description(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: SlashCommand,
    pub argument: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    pub keyword: &'static str,
    pub description: &'static str,
}

impl ParsedCommand {
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// Room named by `/room <name>`; `None` when no name was given
    pub fn room_target(&self) -> Result<Option<Room>, KukanError> {
        if self.command != SlashCommand::Room {
            return Ok(None);
        }

        match self.argument() {
            Some(name) => Room::parse_name(name).map(Some),
            None => Ok(None),
        }
    }
}

impl SlashCommand {
    /// User-visible description shown in help.
    pub fn description(self) -> &'static str {
        match self {
            SlashCommand::Clear => "clear the conversation",
            SlashCommand::Minimize => "collapse to the compact composer",
            SlashCommand::Expand => "show the full assistant",
            SlashCommand::Room => "select a room (bedroom, livingroom, kitchen, bathroom, basement)",
            SlashCommand::Help => "show available commands and keys",
            SlashCommand::Quit => "exit the application",
        }
    }

    /// Command string without the leading '/'.
    pub fn command(self) -> &'static str {
        self.into()
    }
}

/// Return all built-in commands in a Vec paired with their command string.
pub fn built_in_slash_commands() -> Vec<(&'static str, SlashCommand)> {
    SlashCommand::iter().map(|c| (c.command(), c)).collect()
}

/// Parse a slash command from user input
pub fn parse_slash_command(input: &str) -> Option<ParsedCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let mut parts = rest.split_whitespace();
    let head = parts.next()?;
    let tail: Vec<&str> = parts.collect();

    let command = SlashCommand::from_str(head)
        .ok()
        .or_else(|| match head.to_lowercase().as_str() {
            "q" | "exit" | "bye" => Some(SlashCommand::Quit),
            "cls" | "reset" => Some(SlashCommand::Clear),
            "min" => Some(SlashCommand::Minimize),
            "max" => Some(SlashCommand::Expand),
            "h" | "?" => Some(SlashCommand::Help),
            _ => None,
        })?;

    let argument = if tail.is_empty() {
        None
    } else {
        Some(tail.join(" "))
    };

    Some(ParsedCommand { command, argument })
}

/// Get help text for all available commands
pub fn get_help_text() -> String {
    let mut help = String::from("Commands:\n");
    for (command_str, command) in built_in_slash_commands() {
        help.push_str(&format!("  /{:<10} {}\n", command_str, command.description()));
    }

    help.push_str("\nKeys:\n");
    for (keys, what) in [
        ("Enter", "send (Shift+Enter or Alt+Enter for a new line)"),
        ("Tab", "move between composer, toolbar, rooms, quick actions, header"),
        ("Arrows", "move within the focused area"),
        ("Esc", "minimize when the composer is empty"),
        ("PgUp/PgDn", "scroll the conversation"),
        ("Ctrl+L", "clear the conversation"),
        ("Ctrl+C", "quit"),
    ] {
        help.push_str(&format!("  {:<10} {}\n", keys, what));
    }

    help
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_aliases() {
        let parsed = parse_slash_command("/clear").unwrap();
        assert_eq!(parsed.command, SlashCommand::Clear);
        assert_eq!(parsed.argument(), None);

        assert_eq!(parse_slash_command("/q").unwrap().command, SlashCommand::Quit);
        assert_eq!(parse_slash_command("  /min ").unwrap().command, SlashCommand::Minimize);
    }

    #[test]
    fn non_commands_are_plain_text() {
        assert!(parse_slash_command("hello").is_none());
        assert!(parse_slash_command("/").is_none());
        assert!(parse_slash_command("/price check").is_none());
    }

    #[test]
    fn room_argument_resolves() {
        let parsed = parse_slash_command("/room kitchen").unwrap();
        assert_eq!(parsed.room_target(), Ok(Some(Room::Kitchen)));

        let parsed = parse_slash_command("/room living room").unwrap();
        assert_eq!(parsed.room_target(), Ok(Some(Room::Livingroom)));

        let parsed = parse_slash_command("/room attic").unwrap();
        assert_eq!(
            parsed.room_target(),
            Err(KukanError::UnknownRoom("attic".to_string()))
        );

        assert_eq!(parse_slash_command("/room").unwrap().room_target(), Ok(None));
    }

    #[test]
    fn help_lists_every_command() {
        let help = get_help_text();
        for (keyword, _) in built_in_slash_commands() {
            assert!(help.contains(&format!("/{keyword}")));
        }
    }
}
