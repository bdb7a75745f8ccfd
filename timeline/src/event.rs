//! Realtime channel envelope parsing.
//!
//! The channel delivers JSON envelopes `{ "event": "<name>", "data": {...} }`.
//! Each handled event maps to one [`ChannelEvent`]; message payloads go
//! through [`normalize`](crate::message::normalize) so the store only ever
//! sees typed messages.

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;

use serde_json::{Map, Value};

use crate::error::TimelineError;
use crate::message::{
    Message, Reaction, field, id_string, normalize, normalize_all, parse_reaction, str_field, user_name,
};

#[derive(Clone, Debug, PartialEq)]
pub enum ChannelEvent {
    /// `message:new`
    MessageCreated(Message),
    /// `message:history`
    History(Vec<Message>),
    /// `message:reactions`: authoritative reaction list for one message.
    ReactionsReplaced { message_id: String, reactions: Vec<Reaction> },
    /// `message:reaction`: one user toggled one emoji.
    ReactionToggled { message_id: String, reaction: Reaction },
    /// `message:edit`
    MessageEdited { message_id: String, content: String },
    /// `message:delete`
    MessageDeleted { message_id: String },
    /// `game:participants`
    ParticipantsUpdated { message_id: String, participants: Vec<String> },
    /// `typing`
    Typing { user: String },
}

impl ChannelEvent {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::MessageCreated(_) => "message:new",
            Self::History(_) => "message:history",
            Self::ReactionsReplaced { .. } => "message:reactions",
            Self::ReactionToggled { .. } => "message:reaction",
            Self::MessageEdited { .. } => "message:edit",
            Self::MessageDeleted { .. } => "message:delete",
            Self::ParticipantsUpdated { .. } => "game:participants",
            Self::Typing { .. } => "typing",
        }
    }
}

/// Parse one channel envelope.
///
/// # Errors
///
/// Returns [`TimelineError::UnknownEvent`] for unhandled event names,
/// [`TimelineError::MissingField`] when the envelope or payload lacks a
/// required field, and any error produced by message normalization.
pub fn parse_event(envelope: &Value) -> Result<ChannelEvent, TimelineError> {
    let obj = envelope
        .as_object()
        .ok_or_else(|| TimelineError::invalid("event", "expected a JSON object"))?;
    let name = str_field(obj, &["event", "type"]).ok_or(TimelineError::MissingField("event"))?;
    let empty = Value::Object(Map::new());
    let data = field(obj, &["data", "payload"]).unwrap_or(&empty);
    let data_obj = data.as_object();

    let message_id = || {
        data_obj
            .and_then(|d| field(d, &["message_id", "messageId", "id"]))
            .and_then(id_string)
            .ok_or(TimelineError::MissingField("message_id"))
    };

    match name.as_str() {
        "message:new" => Ok(ChannelEvent::MessageCreated(normalize(data)?)),
        "message:history" => {
            let list = data
                .as_array()
                .or_else(|| data_obj.and_then(|d| d.get("messages")).and_then(Value::as_array))
                .ok_or(TimelineError::MissingField("messages"))?;
            Ok(ChannelEvent::History(normalize_all(list)))
        }
        "message:reactions" => {
            let reactions = data_obj
                .and_then(|d| d.get("reactions"))
                .and_then(Value::as_array)
                .ok_or(TimelineError::MissingField("reactions"))?
                .iter()
                .filter_map(parse_reaction)
                .collect();
            Ok(ChannelEvent::ReactionsReplaced { message_id: message_id()?, reactions })
        }
        "message:reaction" => {
            let d = data_obj.ok_or(TimelineError::MissingField("data"))?;
            let user = field(d, &["user", "username"])
                .and_then(user_name)
                .ok_or(TimelineError::MissingField("user"))?;
            let emoji = str_field(d, &["emoji", "reaction"]).ok_or(TimelineError::MissingField("emoji"))?;
            Ok(ChannelEvent::ReactionToggled { message_id: message_id()?, reaction: Reaction { user, emoji } })
        }
        "message:edit" => {
            let content = data_obj
                .and_then(|d| str_field(d, &["content", "text"]))
                .ok_or(TimelineError::MissingField("content"))?;
            Ok(ChannelEvent::MessageEdited { message_id: message_id()?, content })
        }
        "message:delete" => Ok(ChannelEvent::MessageDeleted { message_id: message_id()? }),
        "game:participants" => {
            let participants = data_obj
                .and_then(|d| field(d, &["participants", "players"]))
                .and_then(Value::as_array)
                .ok_or(TimelineError::MissingField("participants"))?
                .iter()
                .filter_map(user_name)
                .collect();
            Ok(ChannelEvent::ParticipantsUpdated { message_id: message_id()?, participants })
        }
        "typing" => {
            let user = data_obj
                .and_then(|d| field(d, &["user", "username"]))
                .and_then(user_name)
                .ok_or(TimelineError::MissingField("user"))?;
            Ok(ChannelEvent::Typing { user })
        }
        _ => Err(TimelineError::UnknownEvent(name)),
    }
}
