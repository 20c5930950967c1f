//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction so the REPL can
//! print with or without ANSI styling.  Assistant turns carry the
//! "Answered by AI" pill; user turns are echoed plainly.

use std::io::{self, Stdout, Write};

use crate::chat::session::{Reachability, SessionStats};
use crate::types::{DebugInfo, Role, Turn};

/// ANSI escape code for bold text (used for the title).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text (used for the pill and typing indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for assistant turns).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for the online dot).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for the offline dot and errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for yellow text (used for the unknown dot).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for magenta text (used for the sparkle).
const ANSI_MAGENTA: &str = "\x1b[35m";

const TITLE: &str = "Smart Librarian";
const PILL: &str = "Answered by AI";

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Print the title bar with the backend status.
    fn print_header(&mut self, reachability: Reachability);

    /// Print one turn of the conversation.
    fn print_turn(&mut self, turn: &Turn);

    /// Print the indicator shown while a request is in flight.
    fn print_typing(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print a session statistics snapshot.
    fn print_stats(&mut self, stats: &SessionStats);

    /// Print backend diagnostics.
    fn print_debug_info(&mut self, info: &DebugInfo);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
    use_color: bool,
}

impl PlainTextRenderer<Stdout> {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            out: io::stdout(),
            use_color,
        }
    }
}

impl Default for PlainTextRenderer<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer that writes to `out`.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self { out, use_color }
    }

    /// Consumes the renderer, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn style(&self, code: &'static str) -> &'static str {
        if self.use_color { code } else { "" }
    }

    fn line(&mut self, text: &str) {
        // Terminal output is best effort.
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn print_header(&mut self, reachability: Reachability) {
        let dot = match reachability {
            Reachability::Online => self.style(ANSI_GREEN),
            Reachability::Offline => self.style(ANSI_RED),
            Reachability::Unknown => self.style(ANSI_YELLOW),
        };
        let header = format!(
            "{bold}{TITLE}{reset}  {dot}●{reset} {reachability}",
            bold = self.style(ANSI_BOLD),
            reset = self.style(ANSI_RESET),
        );
        self.line(&header);
        self.line("Type /help for commands, /quit to exit\n");
    }

    fn print_turn(&mut self, turn: &Turn) {
        match turn.role {
            Role::User => {
                let text = format!("You: {}", turn.content);
                self.line(&text);
            }
            Role::Assistant => {
                let text = format!(
                    "{cyan}Librarian:{reset} {}",
                    turn.content,
                    cyan = self.style(ANSI_CYAN),
                    reset = self.style(ANSI_RESET),
                );
                self.line(&text);
                let pill = format!(
                    "  {magenta}✦{reset} {dim}{PILL}{reset}\n",
                    magenta = self.style(ANSI_MAGENTA),
                    dim = self.style(ANSI_DIM),
                    reset = self.style(ANSI_RESET),
                );
                self.line(&pill);
            }
        }
    }

    fn print_typing(&mut self) {
        let text = format!(
            "{dim}Librarian is thinking…{reset}",
            dim = self.style(ANSI_DIM),
            reset = self.style(ANSI_RESET),
        );
        self.line(&text);
    }

    fn print_error(&mut self, error: &str) {
        let text = format!(
            "{red}Error:{reset} {error}",
            red = self.style(ANSI_RED),
            reset = self.style(ANSI_RESET),
        );
        self.line(&text);
    }

    fn print_info(&mut self, info: &str) {
        self.line(info);
    }

    fn print_stats(&mut self, stats: &SessionStats) {
        self.line("    Session Status:");
        let mut backend = format!("      Backend: {}", stats.reachability);
        if let Some(count) = stats.seed_count {
            backend.push_str(&format!(" ({count} books seeded)"));
        }
        self.line(&backend);
        self.line(&format!("      Request: {:?}", stats.request_state));
        self.line(&format!("      Turns: {}", stats.turn_count));
        self.line(&format!(
            "      Queries: {} sent, {} without a match, {} failed",
            stats.queries_sent, stats.fallbacks, stats.failures
        ));
        match stats.last_error.as_deref() {
            Some(err) => self.line(&format!("      Last error: {err}")),
            None => self.line("      Last error: (none)"),
        }
    }

    fn print_debug_info(&mut self, info: &DebugInfo) {
        self.line("    Backend Diagnostics:");
        self.line(&format!("      API key configured: {}", describe(info.has_key)));
        self.line(&format!(
            "      Chat model: {}",
            describe(info.models_env.as_deref())
        ));
        self.line(&format!(
            "      Embedding model: {}",
            describe(info.embed_model.as_deref())
        ));
        self.line(&format!("      Books: {}", describe(info.books_count)));
        self.line(&format!("      Indexed documents: {}", describe(info.db_count)));
    }
}

fn describe<T: std::fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "(unknown)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::session::RequestState;

    fn render<F: FnOnce(&mut PlainTextRenderer<Vec<u8>>)>(f: F) -> String {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), false);
        f(&mut renderer);
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
    }

    #[test]
    fn header_shows_status() {
        let out = render(|r| r.print_header(Reachability::Online));
        assert!(out.starts_with("Smart Librarian  ● Online\n"));
        let out = render(|r| r.print_header(Reachability::Offline));
        assert!(out.contains("Offline"));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn assistant_turn_has_pill() {
        let out = render(|r| r.print_turn(&Turn::assistant("Try 'Dune'.")));
        assert!(out.starts_with("Librarian: Try 'Dune'.\n"));
        assert!(out.contains("✦ Answered by AI"));
    }

    #[test]
    fn user_turn_has_no_pill() {
        let out = render(|r| r.print_turn(&Turn::user("sea stories")));
        assert_eq!(out, "You: sea stories\n");
    }

    #[test]
    fn colored_output_uses_ansi() {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), true);
        renderer.print_error("boom");
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out, format!("{ANSI_RED}Error:{ANSI_RESET} boom\n"));
    }

    #[test]
    fn stats_output() {
        let stats = SessionStats {
            turn_count: 3,
            request_state: RequestState::Idle,
            reachability: Reachability::Online,
            seed_count: Some(10),
            queries_sent: 1,
            fallbacks: 0,
            failures: 0,
            last_error: None,
        };
        let out = render(|r| r.print_stats(&stats));
        assert!(out.contains("Backend: Online (10 books seeded)"));
        assert!(out.contains("Request: Idle"));
        assert!(out.contains("Last error: (none)"));
    }

    #[test]
    fn debug_info_output() {
        let info = DebugInfo {
            has_key: Some(false),
            books_count: Some(4),
            ..DebugInfo::default()
        };
        let out = render(|r| r.print_debug_info(&info));
        assert!(out.contains("API key configured: false"));
        assert!(out.contains("Chat model: (unknown)"));
        assert!(out.contains("Books: 4"));
    }
}
