//! Render-mode classification for a single message.

#[cfg(test)]
#[path = "classify_test.rs"]
mod classify_test;

use serde::Serialize;

use crate::message::{Message, MessageKind};

/// Game boards the chat view knows how to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameBoard {
    Ludo,
    RockPaperScissors,
    Trivia,
    TicTacToe,
}

impl GameBoard {
    /// Resolve a game from a `game_type` value or a prefixed event type such
    /// as `ludo_roll` or `tictactoe_move`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let lowered = tag.trim().to_ascii_lowercase();
        let candidates = [
            ("ludo", Self::Ludo),
            ("rock_paper_scissors", Self::RockPaperScissors),
            ("rps", Self::RockPaperScissors),
            ("trivia", Self::Trivia),
            ("tic_tac_toe", Self::TicTacToe),
            ("tictactoe", Self::TicTacToe),
        ];
        candidates
            .into_iter()
            .find(|(prefix, _)| lowered == *prefix || lowered.starts_with(&format!("{prefix}_")))
            .map(|(_, board)| board)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Ludo => "Ludo",
            Self::RockPaperScissors => "Rock Paper Scissors",
            Self::Trivia => "Trivia",
            Self::TicTacToe => "Tic-Tac-Toe",
        }
    }
}

/// How the timeline should draw a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "board", rename_all = "snake_case")]
pub enum RenderMode {
    /// Plain text, linkified with [`text_segments`].
    Text,
    Image,
    Video,
    Voice,
    File,
    Gif,
    Poll,
    Game(GameBoard),
    /// Game traffic for a game this client has no board for.
    GenericGame,
}

/// Classify a message. Total: anything unrecognized renders as text or as the
/// generic game box.
#[must_use]
pub fn classify(message: &Message) -> RenderMode {
    if message.is_game() {
        let board = message
            .game_type
            .as_deref()
            .and_then(GameBoard::from_tag)
            .or_else(|| message.event_type.as_deref().and_then(GameBoard::from_tag));
        return board.map_or(RenderMode::GenericGame, RenderMode::Game);
    }

    match message.kind() {
        MessageKind::Text => RenderMode::Text,
        MessageKind::Image => RenderMode::Image,
        MessageKind::Video => RenderMode::Video,
        MessageKind::Voice => RenderMode::Voice,
        MessageKind::File => RenderMode::File,
        MessageKind::Gif => RenderMode::Gif,
        MessageKind::Poll => RenderMode::Poll,
        MessageKind::Game => RenderMode::GenericGame,
    }
}

/// A run of message text, either plain or a link target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TextSegment {
    Plain(String),
    Link(String),
}

/// Split text into plain and link segments. Whitespace stays attached to the
/// surrounding plain segments; trailing sentence punctuation is not part of a link.
#[must_use]
pub fn text_segments(content: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut plain = String::new();

    for token in content.split_inclusive(char::is_whitespace) {
        let word = token.trim_end();
        let trailing_ws = &token[word.len()..];
        let link = word.trim_end_matches(['.', ',', '!', '?', ')', ';', ':']);

        if is_link(link) {
            if !plain.is_empty() {
                segments.push(TextSegment::Plain(std::mem::take(&mut plain)));
            }
            segments.push(TextSegment::Link(link.to_owned()));
            plain.push_str(&word[link.len()..]);
            plain.push_str(trailing_ws);
        } else {
            plain.push_str(token);
        }
    }

    if !plain.is_empty() {
        segments.push(TextSegment::Plain(plain));
    }
    segments
}

fn is_link(word: &str) -> bool {
    let lowered = word.to_ascii_lowercase();
    ["http://", "https://", "www."]
        .iter()
        .any(|prefix| lowered.starts_with(prefix) && lowered.len() > prefix.len())
}
