//! The ordered, append-only record of a conversation.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::to_writer_pretty;

use crate::error::{Error, Result};
use crate::types::Turn;

/// The assistant turn every transcript starts with.
pub const GREETING: &str = "Hi! Tell me what you’re in the mood for (e.g., friendship & magic, war & loss, freedom & social control) and I’ll recommend a book.";

/// Conversation history in display order.
///
/// Insertion order is display order is chronological order.  Turns can only
/// be appended, and only by the chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Creates a transcript holding only the greeting.
    pub fn new() -> Self {
        Self {
            turns: vec![Turn::assistant(GREETING)],
        }
    }

    pub(crate) fn push(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    /// Returns all turns, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the number of turns, including the greeting.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Always false: the greeting is present from the start.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Returns the most recent turn.
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Iterates over turns, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }

    /// Writes the transcript to `path` as pretty-printed JSON.
    ///
    /// This is an export only; sessions never read transcripts back.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let export = TranscriptFile::new(&self.turns);
        let file = File::create(path.as_ref())
            .map_err(|err| Error::io("failed to create transcript file", err))?;
        let writer = BufWriter::new(file);
        to_writer_pretty(writer, &export).map_err(|err| {
            Error::serialization("failed to serialize transcript", Some(Box::new(err)))
        })
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

#[derive(Serialize, Deserialize)]
struct TranscriptFile {
    version: u8,
    turns: Vec<Turn>,
}

impl TranscriptFile {
    fn new(turns: &[Turn]) -> Self {
        Self {
            version: 1,
            turns: turns.to_vec(),
        }
    }
}
