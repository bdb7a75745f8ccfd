//! Message timeline reconciliation for the chat client.
//!
//! This crate is UI-framework agnostic: it turns raw message records from the
//! realtime channel or REST into a clustered, incrementally updated timeline
//! plus the small pieces of optimistic local state the chat view needs.
//!
//! SYSTEM CONTEXT
//! ==============
//! Records arrive as loosely shaped JSON. [`message::normalize`] is the only
//! place that probes optional fields; everything downstream works on the typed
//! [`Message`].

pub mod attachment;
pub mod classify;
pub mod cluster;
pub mod error;
pub mod event;
pub mod join;
pub mod menu;
pub mod message;
pub mod mood;
pub mod poll;
pub mod reactions;
pub mod settings;
pub mod store;

pub use classify::{GameBoard, RenderMode, classify};
pub use cluster::{Cluster, ClusterKind, ClusterMood, ClusterOptions, cluster};
pub use error::TimelineError;
pub use event::{ChannelEvent, parse_event};
pub use join::{ErrorRecovery, JoinState, JoinTracker};
pub use message::{Message, MessageBody, MessageKind, Reaction, normalize, normalize_all};
pub use mood::{Mood, MoodTracker, analyze};
pub use reactions::{CompactReactions, ReactionChip, aggregate, compact};
pub use store::Timeline;
