//! Replays a JSONL channel log through the timeline and local trackers.
//!
//! Each line is a channel envelope `{event, data}`. Three local actions can be
//! interleaved with the server traffic:
//! - `local:join` `{message_id}`: the user clicked join on a game message.
//! - `local:send` `{content}`: an optimistic text message from the user.
//! - `local:fail` `{}`: the user's most recent pending send failed.
//!
//! An optional `at_ms` offset on any line advances the replay clock used by the
//! typing indicator.

use std::time::{Duration, Instant};

use serde_json::Value;
use timeline::menu::TypingIndicator;
use timeline::message::id_string;
use timeline::store::Change;
use timeline::{ChannelEvent, ErrorRecovery, JoinTracker, MessageBody, MoodTracker, Timeline, parse_event};

use crate::CliError;

pub struct Session {
    pub timeline: Timeline,
    pub joins: JoinTracker,
    pub moods: MoodTracker,
    pub typing: TypingIndicator,
    current_user: String,
    started: Instant,
    now: Instant,
}

impl Session {
    #[must_use]
    pub fn new(current_user: &str, recovery: ErrorRecovery) -> Self {
        let started = Instant::now();
        Self {
            timeline: Timeline::new(),
            joins: JoinTracker::new(recovery),
            moods: MoodTracker::new(),
            typing: TypingIndicator::default(),
            current_user: current_user.to_owned(),
            started,
            now: started,
        }
    }

    /// Users shown as typing at the current replay time.
    pub fn typing_users(&mut self) -> Vec<String> {
        let now = self.now;
        self.typing.active_at(&self.current_user, now)
    }

    /// Apply one log line. Blank lines return `Ok(None)`.
    pub fn apply_line(&mut self, line: &str) -> Result<Option<Change>, CliError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let envelope = serde_json::from_str::<Value>(trimmed)?;
        if let Some(at_ms) = envelope.get("at_ms").and_then(Value::as_u64) {
            self.now = self.started + Duration::from_millis(at_ms);
        }

        let name = envelope
            .get("event")
            .or_else(|| envelope.get("type"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        let data = envelope.get("data").unwrap_or(&Value::Null);

        let change = match name {
            "local:join" => self.local_join(data)?,
            "local:send" => self.local_send(data)?,
            "local:fail" => self.local_fail(),
            _ => self.apply_event(parse_event(&envelope)?),
        };

        let released = self.joins.reconcile(self.timeline.messages(), &self.current_user);
        tracing::debug!(event = name, ?change, ?released, "replayed line");
        Ok(Some(change))
    }

    fn apply_event(&mut self, event: ChannelEvent) -> Change {
        if let ChannelEvent::Typing { user } = &event {
            self.typing.record_at(user, self.now);
            return Change::Ignored;
        }

        let change = self.timeline.apply(event);
        let arrived = match &change {
            Change::Inserted(id) | Change::Confirmed { id, .. } => self.timeline.get(id),
            _ => None,
        };
        if let Some(message) = arrived {
            self.typing.stop(&message.sender);
            let mood = self.moods.observe(message.content());
            tracing::debug!(message_id = %message.id, ?mood, "mood observed");
        }
        change
    }

    fn local_join(&mut self, data: &Value) -> Result<Change, CliError> {
        let message_id = data
            .get("message_id")
            .or_else(|| data.get("messageId"))
            .and_then(id_string)
            .ok_or(CliError::MissingField("message_id"))?;
        if self.timeline.get(&message_id).is_none() {
            tracing::warn!(%message_id, "join requested for unknown message");
            return Ok(Change::Ignored);
        }
        Ok(if self.joins.begin_join(&message_id) {
            Change::Updated(message_id)
        } else {
            Change::Ignored
        })
    }

    fn local_send(&mut self, data: &Value) -> Result<Change, CliError> {
        let content = data
            .get("content")
            .and_then(Value::as_str)
            .ok_or(CliError::MissingField("content"))?;
        let now_ms = data
            .get("timestamp")
            .and_then(Value::as_i64)
            .or_else(|| self.timeline.latest().map(|m| m.timestamp.saturating_add(1)))
            .unwrap_or_default();
        let body = MessageBody::Text { content: content.to_owned() };
        let id = self.timeline.push_pending(&self.current_user, body, now_ms);
        Ok(Change::Inserted(id))
    }

    fn local_fail(&mut self) -> Change {
        let pending_id = self
            .timeline
            .messages()
            .iter()
            .rev()
            .find(|m| m.pending && m.sender == self.current_user)
            .map(|m| m.id.clone());
        match pending_id {
            Some(id) if self.timeline.fail_pending(&id).is_some() => Change::Removed(id),
            _ => Change::Ignored,
        }
    }
}

#[cfg(test)]
#[path = "replay_test.rs"]
mod tests;
