//! Ordered message store with optimistic-send bookkeeping.
//!
//! DESIGN
//! ======
//! Messages are kept in timestamp order with an id index. Channel events are
//! applied one at a time; there is no ordering across independent event
//! kinds, so a reaction update and a delete for the same message resolve by
//! arrival order (last write wins on the mutated field).
//!
//! Only `reactions`, `pending`, `edited` (with the edited text), and
//! `participants` change after a message is first stored.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

use uuid::Uuid;

use crate::event::ChannelEvent;
use crate::message::{Message, MessageBody};
use crate::reactions::toggle_reaction;

/// Outcome of applying one event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change {
    Inserted(String),
    Updated(String),
    /// A server echo replaced the optimistic message `pending_id`.
    Confirmed { pending_id: String, id: String },
    Removed(String),
    Replaced(usize),
    /// The event referenced an unknown message or carried no timeline change.
    Ignored,
}

#[derive(Clone, Debug, Default)]
pub struct Timeline {
    messages: Vec<Message>,
    index: HashMap<String, usize>,
}

impl Timeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a timeline from an initial list, e.g. a REST history fetch.
    #[must_use]
    pub fn from_messages(messages: Vec<Message>) -> Self {
        let mut timeline = Self::new();
        timeline.replace_all(messages);
        timeline
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Message> {
        self.index.get(id).map(|&i| &self.messages[i])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Apply one channel event.
    pub fn apply(&mut self, event: ChannelEvent) -> Change {
        let name = event.name();
        let change = match event {
            ChannelEvent::MessageCreated(message) => self.upsert(message),
            ChannelEvent::History(list) => self.replace_all(list),
            ChannelEvent::ReactionsReplaced { message_id, reactions } => {
                self.update(&message_id, |m| m.reactions = reactions)
            }
            ChannelEvent::ReactionToggled { message_id, reaction } => self.update(&message_id, |m| {
                toggle_reaction(&mut m.reactions, &reaction.user, &reaction.emoji);
            }),
            ChannelEvent::MessageEdited { message_id, content } => {
                self.update(&message_id, |m| apply_edit(m, content))
            }
            ChannelEvent::MessageDeleted { message_id } => self.remove(&message_id),
            ChannelEvent::ParticipantsUpdated { message_id, participants } => {
                self.update(&message_id, |m| m.participants = Some(participants))
            }
            ChannelEvent::Typing { .. } => Change::Ignored,
        };
        if change == Change::Ignored {
            tracing::debug!(event = name, "event produced no timeline change");
        }
        change
    }

    /// Insert a new message or merge the mutable fields of a known one.
    pub fn upsert(&mut self, message: Message) -> Change {
        if let Some(pending_id) = message.client_ref.clone()
            && pending_id != message.id
            && self.get(&pending_id).is_some_and(|m| m.pending)
        {
            let id = message.id.clone();
            if self.index.contains_key(&id) {
                // Echo raced a history reload that already contains it.
                self.remove(&pending_id);
                self.merge(message);
            } else {
                self.remove(&pending_id);
                self.insert_ordered(Message { pending: false, ..message });
            }
            tracing::debug!(%pending_id, message_id = %id, "optimistic message confirmed");
            return Change::Confirmed { pending_id, id };
        }

        if self.index.contains_key(&message.id) {
            return self.merge(message);
        }

        let id = message.id.clone();
        self.insert_ordered(message);
        Change::Inserted(id)
    }

    /// Add a locally composed message before the server has acknowledged it.
    /// Returns the client-generated id, which the server echoes as `client_ref`.
    pub fn push_pending(&mut self, sender: &str, body: MessageBody, now_ms: i64) -> String {
        let id = Uuid::new_v4().to_string();
        let mut message = Message::with_body(&id, sender, now_ms, body);
        message.pending = true;
        message.client_ref = Some(id.clone());
        self.insert_ordered(message);
        id
    }

    /// Drop an optimistic message whose send failed.
    pub fn fail_pending(&mut self, pending_id: &str) -> Option<Message> {
        if !self.get(pending_id).is_some_and(|m| m.pending) {
            return None;
        }
        let index = self.index.remove(pending_id)?;
        let removed = self.messages.remove(index);
        self.reindex_from(index);
        tracing::warn!(pending_id, "optimistic message dropped after failed send");
        Some(removed)
    }

    /// Replace the whole list. Local pending messages the new list does not
    /// acknowledge are kept.
    pub fn replace_all(&mut self, messages: Vec<Message>) -> Change {
        let acknowledged = messages
            .iter()
            .filter_map(|m| m.client_ref.clone())
            .collect::<Vec<_>>();
        let still_pending = self
            .messages
            .drain(..)
            .filter(|m| m.pending && !acknowledged.contains(&m.id))
            .collect::<Vec<_>>();

        let mut incoming = Vec::<Message>::with_capacity(messages.len() + still_pending.len());
        let mut seen = HashMap::<String, usize>::with_capacity(messages.len());
        for message in messages {
            if let Some(&at) = seen.get(&message.id) {
                merge_fields(&mut incoming[at], message);
            } else {
                seen.insert(message.id.clone(), incoming.len());
                incoming.push(message);
            }
        }
        incoming.extend(still_pending.into_iter().filter(|m| !seen.contains_key(&m.id)));

        // Stable: equal timestamps keep arrival order, pending messages last.
        incoming.sort_by_key(|m| m.timestamp);
        self.messages = incoming;
        self.index.clear();
        self.reindex_from(0);
        Change::Replaced(self.messages.len())
    }

    fn merge(&mut self, incoming: Message) -> Change {
        let id = incoming.id.clone();
        self.update(&id, |current| merge_fields(current, incoming))
    }

    fn update(&mut self, id: &str, f: impl FnOnce(&mut Message)) -> Change {
        let Some(&index) = self.index.get(id) else {
            tracing::debug!(message_id = id, "update for unknown message ignored");
            return Change::Ignored;
        };
        f(&mut self.messages[index]);
        Change::Updated(id.to_owned())
    }

    fn remove(&mut self, id: &str) -> Change {
        let Some(index) = self.index.get(id).copied() else {
            return Change::Ignored;
        };
        self.index.remove(id);
        self.messages.remove(index);
        self.reindex_from(index);
        Change::Removed(id.to_owned())
    }

    fn insert_ordered(&mut self, message: Message) {
        let position = self
            .messages
            .iter()
            .rposition(|m| m.timestamp <= message.timestamp)
            .map_or(0, |i| i + 1);
        self.messages.insert(position, message);
        self.reindex_from(position);
    }

    /// Refresh index entries for `messages[start..]` after a shift.
    fn reindex_from(&mut self, start: usize) {
        for (i, message) in self.messages.iter().enumerate().skip(start) {
            match self.index.get_mut(&message.id) {
                Some(slot) => *slot = i,
                None => {
                    self.index.insert(message.id.clone(), i);
                }
            }
        }
    }
}

fn merge_fields(current: &mut Message, incoming: Message) {
    current.reactions = incoming.reactions;
    current.pending = incoming.pending;
    if incoming.participants.is_some() {
        current.participants = incoming.participants;
    }
    if incoming.edited {
        current.edited = true;
        current.body = incoming.body;
    }
}

fn apply_edit(message: &mut Message, content: String) {
    message.edited = true;
    match &mut message.body {
        MessageBody::Text { content: current } | MessageBody::Game { content: current, .. } => {
            *current = content;
        }
        MessageBody::Image { caption, .. } | MessageBody::Video { caption, .. } => {
            *caption = Some(content);
        }
        _ => {}
    }
}
