//! Grouping consecutive messages into visual clusters.
//!
//! DESIGN
//! ======
//! Clusters are derived data: they are rebuilt from the full message list on
//! every call and never mutated independently. A single forward pass decides
//! boundaries by comparing each message with its predecessor.

#[cfg(test)]
#[path = "cluster_test.rs"]
mod cluster_test;

use serde::Serialize;

use crate::message::Message;

/// Largest gap between two messages that still keeps them in one cluster.
pub const DEFAULT_CLUSTER_GAP_MS: i64 = 300_000;

/// Words whose presence marks a game-related topic.
pub const DEFAULT_TOPIC_KEYWORDS: [&str; 4] = ["game", "play", "dice", "coin"];

const POSITIVE_WORDS: [&str; 12] = [
    "happy", "great", "awesome", "love", "good", "nice", "thanks", "lol", "haha", "😀", "😂", "👍",
];
const NEGATIVE_WORDS: [&str; 10] =
    ["sad", "bad", "angry", "hate", "terrible", "awful", "sorry", "😢", "😠", "👎"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterKind {
    Game,
    Media,
    Conversation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterMood {
    Positive,
    Negative,
    Neutral,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Cluster {
    pub messages: Vec<Message>,
    pub kind: ClusterKind,
    pub mood: ClusterMood,
}

impl Cluster {
    #[must_use]
    pub fn sender(&self) -> Option<&str> {
        self.messages.first().map(|m| m.sender.as_str())
    }

    #[must_use]
    pub fn started_at(&self) -> Option<i64> {
        self.messages.first().map(|m| m.timestamp)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterOptions {
    pub gap_ms: i64,
    pub topic_keywords: Vec<String>,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            gap_ms: DEFAULT_CLUSTER_GAP_MS,
            topic_keywords: DEFAULT_TOPIC_KEYWORDS.into_iter().map(str::to_owned).collect(),
        }
    }
}

/// Cluster with the default gap and topic keywords.
#[must_use]
pub fn cluster(messages: &[Message]) -> Vec<Cluster> {
    cluster_with(messages, &ClusterOptions::default())
}

#[must_use]
pub fn cluster_with(messages: &[Message], options: &ClusterOptions) -> Vec<Cluster> {
    let mut clusters = Vec::new();
    let mut current: Vec<Message> = Vec::new();

    for message in messages {
        if let Some(previous) = current.last()
            && starts_new_cluster(previous, message, options)
        {
            clusters.push(finish(std::mem::take(&mut current)));
        }
        current.push(message.clone());
    }

    if !current.is_empty() {
        clusters.push(finish(current));
    }
    clusters
}

fn starts_new_cluster(previous: &Message, message: &Message, options: &ClusterOptions) -> bool {
    message.sender != previous.sender
        || message.timestamp.saturating_sub(previous.timestamp) > options.gap_ms
        || message.kind() != previous.kind()
        || mentions_topic(previous, options) != mentions_topic(message, options)
}

fn mentions_topic(message: &Message, options: &ClusterOptions) -> bool {
    let content = message.content().to_lowercase();
    options
        .topic_keywords
        .iter()
        .any(|keyword| content.contains(keyword.as_str()))
}

fn finish(messages: Vec<Message>) -> Cluster {
    let kind = if messages.iter().any(Message::is_game) {
        ClusterKind::Game
    } else if messages.iter().filter(|m| m.kind().is_media()).count() * 2 > messages.len() {
        ClusterKind::Media
    } else {
        ClusterKind::Conversation
    };

    let text = messages
        .iter()
        .map(|m| m.content().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    let mood = if POSITIVE_WORDS.iter().any(|w| text.contains(w)) {
        ClusterMood::Positive
    } else if NEGATIVE_WORDS.iter().any(|w| text.contains(w)) {
        ClusterMood::Negative
    } else {
        ClusterMood::Neutral
    };

    Cluster { messages, kind, mood }
}
