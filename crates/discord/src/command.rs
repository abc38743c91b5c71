//! Prefix-command parsing.

use overlaybot_overlay::CommandSyntax;

/// A message recognised as one of the bot's commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// `!overlay [selector]`; any further words are ignored.
    Overlay { selector: Option<String> },
    /// `!help`
    Help,
}

/// Parse `content` as a command, or `None` when it is ordinary chat.
pub fn parse_command(content: &str, syntax: &CommandSyntax) -> Option<ParsedCommand> {
    let rest = content.trim_start().strip_prefix(syntax.prefix.as_str())?;
    let mut words = rest.split_whitespace();
    let name = words.next()?;

    // The command name must directly follow the prefix.
    if rest.starts_with(char::is_whitespace) {
        return None;
    }

    if name == syntax.name {
        let selector = words.next().map(unquote).filter(|s| !s.is_empty());
        Some(ParsedCommand::Overlay {
            selector: selector.map(str::to_string),
        })
    } else if name == "help" {
        Some(ParsedCommand::Help)
    } else {
        None
    }
}

fn unquote(word: &str) -> &str {
    word.trim_matches(|c| c == '"' || c == '\'')
}
