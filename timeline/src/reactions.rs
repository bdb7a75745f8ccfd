//! Reaction aggregation for display.
//!
//! Own reactions are always visible; other users' reactions only appear while
//! the message is hovered. Aggregation is recomputed per call because the
//! reaction list mutates in place as channel events arrive.

#[cfg(test)]
#[path = "reactions_test.rs"]
mod reactions_test;

use serde::Serialize;

use crate::message::Reaction;

/// Emoji groups shown before the compact view collapses the rest.
pub const DEFAULT_COMPACT_CAP: usize = 3;

/// One emoji group as displayed under a message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReactionChip {
    pub emoji: String,
    pub count: usize,
    /// The current user contributed to this group.
    pub mine: bool,
}

impl ReactionChip {
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.emoji, self.count)
    }
}

/// `+N` chip that opens an emoji picker anchored to its message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OverflowChip {
    pub hidden: usize,
    pub anchor_message_id: String,
}

impl OverflowChip {
    #[must_use]
    pub fn label(&self) -> String {
        format!("+{}", self.hidden)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompactReactions {
    pub shown: Vec<ReactionChip>,
    pub overflow: Option<OverflowChip>,
}

/// Group reactions by emoji in first-appearance order.
///
/// With `hovered == false` only the current user's reactions are counted, so
/// no other user's emoji can leak into the collapsed view.
#[must_use]
pub fn aggregate(reactions: &[Reaction], current_user: &str, hovered: bool) -> Vec<ReactionChip> {
    let mut chips: Vec<ReactionChip> = Vec::new();
    for reaction in reactions {
        let mine = reaction.user == current_user;
        if !mine && !hovered {
            continue;
        }
        if let Some(chip) = chips.iter_mut().find(|c| c.emoji == reaction.emoji) {
            chip.count += 1;
            chip.mine |= mine;
        } else {
            chips.push(ReactionChip { emoji: reaction.emoji.clone(), count: 1, mine });
        }
    }
    chips
}

/// Keep at most `cap` groups; the remainder collapses into an overflow chip.
#[must_use]
pub fn compact(chips: Vec<ReactionChip>, cap: usize, message_id: &str) -> CompactReactions {
    if chips.len() <= cap {
        return CompactReactions { shown: chips, overflow: None };
    }
    let hidden = chips.len() - cap;
    let mut shown = chips;
    shown.truncate(cap);
    CompactReactions {
        shown,
        overflow: Some(OverflowChip { hidden, anchor_message_id: message_id.to_owned() }),
    }
}

/// Add `(user, emoji)`, or remove it if the user already reacted with it.
/// Returns `true` when the reaction was added.
pub fn toggle_reaction(reactions: &mut Vec<Reaction>, user: &str, emoji: &str) -> bool {
    if let Some(index) = reactions.iter().position(|r| r.user == user && r.emoji == emoji) {
        reactions.remove(index);
        false
    } else {
        reactions.push(Reaction::new(user, emoji));
        true
    }
}
