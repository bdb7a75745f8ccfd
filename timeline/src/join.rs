//! Join-in-progress flags for game messages.
//!
//! DESIGN
//! ======
//! Each message id is `Idle` or `Joining`. A click moves it to `Joining`; the
//! flag is released when the server's participant list for that message (or
//! a game message pointing at it via `parent_message_id`) contains the current
//! user, or when an `_error` typed message shows up.
//!
//! TRADE-OFFS
//! ==========
//! There is no timeout. A server that never confirms leaves the flag set until
//! some error message arrives. Under `ErrorRecovery::ClearAll` any error
//! releases every pending join, including unrelated ones.

#[cfg(test)]
#[path = "join_test.rs"]
mod join_test;

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::message::Message;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinState {
    #[default]
    Idle,
    Joining,
}

/// What an observed `_error` message releases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorRecovery {
    /// Clear every in-progress join.
    #[default]
    ClearAll,
    /// Clear only the join named by the error's `parent_message_id`; errors
    /// that name no message fall back to clearing everything.
    Correlated,
}

#[derive(Clone, Debug, Default)]
pub struct JoinTracker {
    joining: BTreeSet<String>,
    seen_errors: HashSet<String>,
    recovery: ErrorRecovery,
}

impl JoinTracker {
    #[must_use]
    pub fn new(recovery: ErrorRecovery) -> Self {
        Self { recovery, ..Self::default() }
    }

    #[must_use]
    pub fn state(&self, message_id: &str) -> JoinState {
        if self.joining.contains(message_id) {
            JoinState::Joining
        } else {
            JoinState::Idle
        }
    }

    #[must_use]
    pub fn is_joining(&self, message_id: &str) -> bool {
        self.state(message_id) == JoinState::Joining
    }

    /// Ids currently waiting on server confirmation, sorted.
    #[must_use]
    pub fn pending(&self) -> Vec<String> {
        self.joining.iter().cloned().collect()
    }

    /// User clicked "join". Returns `false` (and does nothing) when a join
    /// for this message is already in flight.
    pub fn begin_join(&mut self, message_id: &str) -> bool {
        let started = self.joining.insert(message_id.to_owned());
        if started {
            tracing::debug!(message_id, "join started");
        } else {
            tracing::debug!(message_id, "join already in progress; ignoring click");
        }
        started
    }

    /// Release flags confirmed or failed by the current message list.
    /// Returns the ids that moved back to `Idle`, sorted.
    pub fn reconcile(&mut self, messages: &[Message], current_user: &str) -> Vec<String> {
        let mut released = BTreeSet::new();

        for id in &self.joining {
            let confirmed = messages.iter().any(|m| {
                (m.id == *id || m.parent_message_id.as_deref() == Some(id.as_str()))
                    && m.has_participant(current_user)
            });
            if confirmed {
                released.insert(id.clone());
            }
        }

        for message in messages.iter().filter(|m| m.is_error_event()) {
            if !self.seen_errors.insert(message.id.clone()) {
                continue;
            }
            let target = message.parent_message_id.as_deref();
            match (self.recovery, target) {
                (ErrorRecovery::Correlated, Some(target)) => {
                    if self.joining.contains(target) {
                        released.insert(target.to_owned());
                    }
                }
                _ => {
                    tracing::warn!(
                        error_message_id = %message.id,
                        cleared = self.joining.len(),
                        "game error observed; clearing join flags"
                    );
                    released.extend(self.joining.iter().cloned());
                }
            }
        }

        for id in &released {
            self.joining.remove(id);
        }
        released.into_iter().collect()
    }

    /// Drop all state, as when the chat view is torn down.
    pub fn clear(&mut self) {
        self.joining.clear();
        self.seen_errors.clear();
    }
}
