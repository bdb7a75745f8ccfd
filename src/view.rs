//! Serializable timeline view model printed by the CLI.
//!
//! DESIGN
//! ======
//! Everything here is recomputed from the message list and the local trackers
//! on each call: clusters, render modes, reaction chips, and the mood theme.

use serde::Serialize;
use timeline::classify::{TextSegment, text_segments};
use timeline::cluster::{Cluster, ClusterKind, ClusterMood};
use timeline::mood::{MoodTheme, mood_theme};
use timeline::poll::{PollTally, tally};
use timeline::reactions::{OverflowChip, ReactionChip};
use timeline::settings::Preferences;
use timeline::{JoinTracker, Message, MessageBody, MoodTracker, RenderMode, aggregate, classify, cluster, compact};

#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub current_user: String,
    /// Message currently under the pointer; its reactions show in full.
    pub hovered: Option<String>,
    /// Treat every message as hovered.
    pub hover_all: bool,
    pub preferences: Preferences,
    pub typing: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineView {
    pub clusters: Vec<ClusterView>,
    pub theme: Option<MoodTheme>,
    pub joining: Vec<String>,
    pub typing: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClusterView {
    pub kind: ClusterKind,
    pub mood: ClusterMood,
    pub sender: Option<String>,
    pub started_at: Option<i64>,
    pub messages: Vec<MessageView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub id: String,
    pub sender: String,
    pub timestamp: i64,
    pub render: RenderMode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<TextSegment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll: Option<PollTally>,
    pub reactions: Vec<ReactionChip>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction_overflow: Option<OverflowChip>,
    pub pending: bool,
    pub edited: bool,
    pub joining: bool,
}

#[must_use]
pub fn build_view(
    messages: &[Message],
    joins: &JoinTracker,
    moods: &MoodTracker,
    options: &ViewOptions,
) -> TimelineView {
    let clusters = cluster(messages)
        .iter()
        .map(|c| cluster_view(c, joins, options))
        .collect();
    let theme = options
        .preferences
        .mood_theme
        .then(|| mood_theme(moods.theme()));

    TimelineView {
        clusters,
        theme,
        joining: joins.pending(),
        typing: options.typing.clone(),
    }
}

fn cluster_view(group: &Cluster, joins: &JoinTracker, options: &ViewOptions) -> ClusterView {
    ClusterView {
        kind: group.kind,
        mood: group.mood,
        sender: group.sender().map(str::to_owned),
        started_at: group.started_at(),
        messages: group
            .messages
            .iter()
            .map(|m| message_view(m, joins, options))
            .collect(),
    }
}

fn message_view(message: &Message, joins: &JoinTracker, options: &ViewOptions) -> MessageView {
    let render = classify(message);
    let hovered = options.hover_all || options.hovered.as_deref() == Some(message.id.as_str());
    let chips = aggregate(&message.reactions, &options.current_user, hovered);

    let (reactions, reaction_overflow) = if options.preferences.compact_reactions {
        let view = compact(chips, options.preferences.reaction_cap, &message.id);
        (view.shown, view.overflow)
    } else {
        (chips, None)
    };

    let text = match render {
        RenderMode::Text => text_segments(message.content()),
        _ => Vec::new(),
    };
    let poll = match &message.body {
        MessageBody::Poll { options: poll_options, .. } => Some(tally(poll_options, &options.current_user)),
        _ => None,
    };

    MessageView {
        id: message.id.clone(),
        sender: message.sender.clone(),
        timestamp: message.timestamp,
        render,
        text,
        poll,
        reactions,
        reaction_overflow,
        pending: message.pending,
        edited: message.edited,
        joining: joins.is_joining(&message.id),
    }
}

#[cfg(test)]
#[path = "view_test.rs"]
mod tests;
