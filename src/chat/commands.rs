//! Slash command parsing for the chat application.
//!
//! Input starting with `/` controls the client and is never sent to the
//! backend as a query.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Reprint the conversation.
    History,

    /// Show backend reachability and session statistics.
    Status,

    /// Ask the backend's health endpoint.
    Health,

    /// Show backend diagnostics.
    Debug,

    /// Export the transcript to a file.
    Save(String),

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be submitted as a query.
///
/// # Examples
///
/// ```
/// # use smart_librarian::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/save chat.json").is_some());
/// assert!(parse_command("books about the sea").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "history" => ChatCommand::History,
        "status" | "stats" => ChatCommand::Status,
        "health" => ChatCommand::Health,
        "debug" => ChatCommand::Debug,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "save" => match argument {
            Some(arg) => ChatCommand::Save(arg.to_string()),
            None => ChatCommand::Invalid("/save requires a file path".to_string()),
        },
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /history               Show the conversation so far
  /status                Show backend status and session statistics
  /health                Check the backend health endpoint
  /debug                 Show backend diagnostics
  /save <file>           Export the transcript as JSON
  /help                  Show this help message
  /quit                  Exit the chat"#
}
