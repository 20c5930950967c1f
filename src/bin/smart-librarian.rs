//! Interactive chat client for the Smart Librarian recommendation service.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a backend on the default address
//! smart-librarian
//!
//! # Point at another backend
//! smart-librarian --base-url http://librarian.internal:8000
//!
//! # Disable colors (useful for piping output)
//! smart-librarian --no-color
//! ```
//!
//! Set `RUST_LOG=smart_librarian=debug` to see request logging on stderr.
//!
//! Ctrl+C at the prompt discards the current line.  In-flight requests cannot
//! be cancelled: Ctrl+C while waiting for a reply terminates the process, and
//! a request that hangs is bounded only by `--timeout-secs`.

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use smart_librarian::LibrarianClient;
use smart_librarian::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, help_text,
    parse_command,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("smart-librarian [OPTIONS]");
    let config = ChatConfig::from(args);

    let client = config.client()?;
    tracing::info!(base_url = %client.base_url(), "starting session");
    let mut session = ChatSession::new(client);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    if config.probe_on_start {
        session.probe_backend().await;
    }
    renderer.print_header(session.reachability());
    for turn in session.transcript() {
        renderer.print_turn(turn);
    }

    loop {
        match rl.readline("You: ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.trim());

                if let Some(cmd) = parse_command(&line) {
                    if !run_command(cmd, &session, &mut renderer).await {
                        break;
                    }
                    continue;
                }

                session.set_input(line);
                renderer.print_typing();
                if let Some(turn) = session.submit().await {
                    renderer.print_turn(turn);
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt discards the line
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

/// Executes a slash command.  Returns false when the REPL should exit.
async fn run_command(
    cmd: ChatCommand,
    session: &ChatSession<LibrarianClient>,
    renderer: &mut dyn Renderer,
) -> bool {
    match cmd {
        ChatCommand::Quit => {
            renderer.print_info("Goodbye!");
            return false;
        }
        ChatCommand::Help => {
            for line in help_text().lines() {
                renderer.print_info(&format!("    {}", line));
            }
        }
        ChatCommand::History => {
            for turn in session.transcript() {
                renderer.print_turn(turn);
            }
        }
        ChatCommand::Status => {
            renderer.print_stats(&session.stats());
        }
        ChatCommand::Health => match session.health().await {
            Ok(status) if status.ok => renderer.print_info("Backend is healthy."),
            Ok(_) => renderer.print_error("Backend reported itself unhealthy."),
            Err(err) => renderer.print_error(&format!("Health check failed: {}", err)),
        },
        ChatCommand::Debug => match session.debug_info().await {
            Ok(info) => renderer.print_debug_info(&info),
            Err(err) => renderer.print_error(&format!("Failed to fetch diagnostics: {}", err)),
        },
        ChatCommand::Save(path) => match session.save_transcript_to(&path) {
            Ok(_) => renderer.print_info(&format!("Transcript saved to {}", path)),
            Err(err) => renderer.print_error(&format!("Failed to save transcript: {}", err)),
        },
        ChatCommand::Invalid(message) => {
            renderer.print_error(&message);
        }
    }
    true
}
