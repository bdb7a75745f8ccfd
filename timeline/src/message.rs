//! Typed message model and the ingestion-time normalization step.
//!
//! DESIGN
//! ======
//! The backend emits several shapes for the same record (`message_type` vs
//! `messageType`, `gif_data` vs `data`, sender as string or user object).
//! `normalize` resolves all of them once, so render-time code never probes
//! optional fields.

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::classify::GameBoard;
use crate::error::TimelineError;

/// Top-level rendering family of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Video,
    Voice,
    File,
    Gif,
    Poll,
    Game,
}

impl MessageKind {
    /// Parse a backend `message_type` value. Aliases seen on the wire are accepted.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "message" => Some(Self::Text),
            "image" | "photo" | "drawing" => Some(Self::Image),
            "video" => Some(Self::Video),
            "voice" | "audio" => Some(Self::Voice),
            "file" | "document" => Some(Self::File),
            "gif" => Some(Self::Gif),
            "poll" => Some(Self::Poll),
            "game" => Some(Self::Game),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Voice => "voice",
            Self::File => "file",
            Self::Gif => "gif",
            Self::Poll => "poll",
            Self::Game => "game",
        }
    }

    /// Image, video, and voice count toward a media cluster.
    #[must_use]
    pub fn is_media(self) -> bool {
        matches!(self, Self::Image | Self::Video | Self::Voice)
    }
}

/// One option of a poll and the users who voted for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub text: String,
    pub votes: Vec<String>,
}

/// Kind-specific payload of a message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MessageBody {
    Text { content: String },
    Image { url: String, caption: Option<String> },
    Video { url: String, caption: Option<String> },
    Voice { url: String, duration_secs: Option<f64> },
    File { url: String, name: Option<String>, size: Option<u64> },
    Gif { url: String, title: Option<String> },
    Poll { question: String, options: Vec<PollOption> },
    Game { content: String, state: Value },
}

impl MessageBody {
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Text { .. } => MessageKind::Text,
            Self::Image { .. } => MessageKind::Image,
            Self::Video { .. } => MessageKind::Video,
            Self::Voice { .. } => MessageKind::Voice,
            Self::File { .. } => MessageKind::File,
            Self::Gif { .. } => MessageKind::Gif,
            Self::Poll { .. } => MessageKind::Poll,
            Self::Game { .. } => MessageKind::Game,
        }
    }

    /// Human-readable text carried by the body, used for mood and topic checks.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text { content } | Self::Game { content, .. } => content,
            Self::Image { caption, .. } | Self::Video { caption, .. } => {
                caption.as_deref().unwrap_or_default()
            }
            Self::Gif { title, .. } => title.as_deref().unwrap_or_default(),
            Self::File { name, .. } => name.as_deref().unwrap_or_default(),
            Self::Poll { question, .. } => question,
            Self::Voice { .. } => "",
        }
    }
}

/// A (user, emoji) pair attached to a message.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reaction {
    pub user: String,
    pub emoji: String,
}

impl Reaction {
    #[must_use]
    pub fn new(user: &str, emoji: &str) -> Self {
        Self { user: user.to_owned(), emoji: emoji.to_owned() }
    }
}

/// A normalized chat message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub body: MessageBody,
    pub reactions: Vec<Reaction>,
    pub parent_message_id: Option<String>,
    pub participants: Option<Vec<String>>,
    pub game_type: Option<String>,
    /// Raw backend `type`, e.g. `"ludo_start"` or `"game_error"`.
    pub event_type: Option<String>,
    pub pending: bool,
    pub edited: bool,
    /// Client-generated id echoed back by the server for optimistic sends.
    pub client_ref: Option<String>,
}

impl Message {
    /// Plain text message with no reactions or game metadata.
    #[must_use]
    pub fn text(id: &str, sender: &str, timestamp: i64, content: &str) -> Self {
        Self::with_body(id, sender, timestamp, MessageBody::Text { content: content.to_owned() })
    }

    #[must_use]
    pub fn with_body(id: &str, sender: &str, timestamp: i64, body: MessageBody) -> Self {
        Self {
            id: id.to_owned(),
            sender: sender.to_owned(),
            timestamp,
            body,
            reactions: Vec::new(),
            parent_message_id: None,
            participants: None,
            game_type: None,
            event_type: None,
            pending: false,
            edited: false,
            client_ref: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> MessageKind {
        self.body.kind()
    }

    #[must_use]
    pub fn content(&self) -> &str {
        self.body.text()
    }

    /// True when the message belongs to a game: a game body, a game type, or
    /// a game-like event type.
    #[must_use]
    pub fn is_game(&self) -> bool {
        self.kind() == MessageKind::Game
            || self.game_type.is_some()
            || self.event_type.as_deref().is_some_and(is_game_event_type)
    }

    /// Server-side game failures arrive as messages typed `<something>_error`.
    #[must_use]
    pub fn is_error_event(&self) -> bool {
        self.event_type.as_deref().is_some_and(|t| t.ends_with("_error"))
    }

    #[must_use]
    pub fn has_participant(&self, user: &str) -> bool {
        self.participants
            .as_ref()
            .is_some_and(|list| list.iter().any(|p| p == user))
    }
}

/// Event types like `game_start`, `ludo_move`, or `trivia_error` mark game traffic.
#[must_use]
pub fn is_game_event_type(event_type: &str) -> bool {
    let lowered = event_type.to_ascii_lowercase();
    lowered.contains("game") || GameBoard::from_tag(&lowered).is_some()
}

/// Normalize one raw backend record into a [`Message`].
///
/// # Errors
///
/// Returns [`TimelineError::MissingField`] when `id`, `sender`, or the
/// timestamp is absent, and [`TimelineError::InvalidField`] when the record is
/// not an object or its timestamp cannot be parsed.
pub fn normalize(raw: &Value) -> Result<Message, TimelineError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| TimelineError::invalid("message", "expected a JSON object"))?;

    let id = field(obj, &["id", "_id"])
        .and_then(id_string)
        .ok_or(TimelineError::MissingField("id"))?;
    let sender = field(obj, &["sender", "user", "username", "from"])
        .and_then(user_name)
        .ok_or(TimelineError::MissingField("sender"))?;
    let timestamp = field(obj, &["timestamp", "created_at", "createdAt", "ts"])
        .ok_or(TimelineError::MissingField("timestamp"))
        .and_then(parse_timestamp)?;

    let event_type = str_field(obj, &["type"]);
    let game_type = str_field(obj, &["game_type", "gameType"]);
    let declared = str_field(obj, &["message_type", "messageType"]);
    let looks_like_game =
        game_type.is_some() || event_type.as_deref().is_some_and(is_game_event_type);

    // `type` doubles as the kind when no explicit message type is given.
    let kind = match declared
        .as_deref()
        .or(event_type.as_deref())
        .and_then(MessageKind::parse)
    {
        Some(kind) => kind,
        None if looks_like_game => MessageKind::Game,
        None => MessageKind::Text,
    };

    let body = build_body(kind, obj);

    let reactions = obj
        .get("reactions")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_reaction).collect::<Vec<_>>())
        .unwrap_or_default();

    let participants = obj
        .get("participants")
        .or_else(|| game_state_field(&body, &["participants", "players"]))
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(user_name).collect::<Vec<_>>());

    Ok(Message {
        id,
        sender,
        timestamp,
        body,
        reactions,
        parent_message_id: field(obj, &["parent_message_id", "parentMessageId"]).and_then(id_string),
        participants,
        game_type,
        event_type,
        pending: bool_field(obj, &["pending"]),
        edited: bool_field(obj, &["edited", "is_edited", "isEdited"]),
        client_ref: str_field(obj, &["client_ref", "clientRef", "temp_id", "tempId"]),
    })
}

/// Normalize a batch, skipping (and logging) records that cannot be read.
#[must_use]
pub fn normalize_all(raw: &[Value]) -> Vec<Message> {
    raw.iter()
        .enumerate()
        .filter_map(|(index, value)| match normalize(value) {
            Ok(message) => Some(message),
            Err(error) => {
                tracing::warn!(%error, index, "skipping unreadable message record");
                None
            }
        })
        .collect()
}

fn build_body(kind: MessageKind, obj: &Map<String, Value>) -> MessageBody {
    let content = str_field(obj, &["content", "text", "message"]).unwrap_or_default();
    let media_url = || {
        str_field(obj, &["media_url", "mediaUrl", "file_url", "fileUrl", "url"])
            .unwrap_or_else(|| content.clone())
    };
    let caption = || str_field(obj, &["caption"]);

    match kind {
        MessageKind::Text => MessageBody::Text { content },
        MessageKind::Image => MessageBody::Image { url: media_url(), caption: caption() },
        MessageKind::Video => MessageBody::Video { url: media_url(), caption: caption() },
        MessageKind::Voice => MessageBody::Voice {
            url: media_url(),
            duration_secs: field(obj, &["duration", "duration_secs", "durationSecs"])
                .and_then(Value::as_f64),
        },
        MessageKind::File => MessageBody::File {
            url: media_url(),
            name: str_field(obj, &["file_name", "fileName", "name"]),
            size: field(obj, &["file_size", "fileSize", "size"]).and_then(Value::as_u64),
        },
        MessageKind::Gif => {
            let data = field(obj, &["gif_data", "gifData", "data"]).and_then(Value::as_object);
            let url = data
                .and_then(|d| str_field(d, &["url"]))
                .unwrap_or_else(media_url);
            let title = data.and_then(|d| str_field(d, &["title"]));
            MessageBody::Gif { url, title }
        }
        MessageKind::Poll => {
            let poll = obj.get("poll").and_then(Value::as_object).unwrap_or(obj);
            let question = str_field(poll, &["question"]).unwrap_or_else(|| content.clone());
            let options = poll
                .get("options")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(parse_poll_option).collect::<Vec<_>>())
                .unwrap_or_default();
            MessageBody::Poll { question, options }
        }
        MessageKind::Game => MessageBody::Game {
            content,
            state: field(obj, &["game_state", "gameState", "game", "data"])
                .cloned()
                .unwrap_or(Value::Null),
        },
    }
}

fn game_state_field<'a>(body: &'a MessageBody, keys: &[&str]) -> Option<&'a Value> {
    match body {
        MessageBody::Game { state: Value::Object(map), .. } => field(map, keys),
        _ => None,
    }
}

fn parse_poll_option(value: &Value) -> Option<PollOption> {
    if let Some(text) = value.as_str() {
        return Some(PollOption { text: text.to_owned(), votes: Vec::new() });
    }
    let obj = value.as_object()?;
    let text = str_field(obj, &["text", "option", "label"])?;
    let votes = obj
        .get("votes")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(user_name).collect::<Vec<_>>())
        .unwrap_or_default();
    Some(PollOption { text, votes })
}

pub(crate) fn parse_reaction(value: &Value) -> Option<Reaction> {
    let obj = value.as_object()?;
    let user = field(obj, &["user", "username", "user_id"]).and_then(user_name)?;
    let emoji = str_field(obj, &["emoji", "reaction"])?;
    Some(Reaction { user, emoji })
}

pub(crate) fn parse_timestamp(value: &Value) -> Result<i64, TimelineError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64))
            .ok_or_else(|| TimelineError::invalid("timestamp", n.to_string())),
        Value::String(s) => {
            if let Ok(ms) = s.trim().parse::<i64>() {
                return Ok(ms);
            }
            let parsed = OffsetDateTime::parse(s.trim(), &Rfc3339)
                .map_err(|e| TimelineError::invalid("timestamp", e.to_string()))?;
            i64::try_from(parsed.unix_timestamp_nanos() / 1_000_000)
                .map_err(|e| TimelineError::invalid("timestamp", e.to_string()))
        }
        other => Err(TimelineError::invalid("timestamp", other.to_string())),
    }
}

pub(crate) fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

pub(crate) fn str_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    field(obj, keys)
        .and_then(Value::as_str)
        .map(str::to_owned)
}

fn bool_field(obj: &Map<String, Value>, keys: &[&str]) -> bool {
    field(obj, keys).and_then(Value::as_bool).unwrap_or(false)
}

/// Ids arrive as non-empty strings or numbers.
#[must_use]
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Users appear as bare names or as objects carrying `username`/`name`.
pub(crate) fn user_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(obj) => str_field(obj, &["username", "name"]),
        _ => None,
    }
}
