//! Timer-driven UI state: the mobile emoji menu and typing indicators.
//!
//! Both are explicit state machines advanced with a caller-supplied
//! `Instant`, so the event loop owns the clock and tests can step it.

#[cfg(test)]
#[path = "menu_test.rs"]
mod menu_test;

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Time the emoji menu stays open without interaction.
pub const EMOJI_MENU_TIMEOUT: Duration = Duration::from_secs(3);
/// Time a user keeps showing as typing after their last keystroke event.
pub const TYPING_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MenuState {
    #[default]
    Hidden,
    Visible {
        since: Instant,
    },
}

/// Emoji action menu: `Hidden --show--> Visible --(timeout)--> Hidden`.
#[derive(Clone, Debug)]
pub struct EmojiMenu {
    state: MenuState,
    message_id: Option<String>,
    timeout: Duration,
}

impl Default for EmojiMenu {
    fn default() -> Self {
        Self::new(EMOJI_MENU_TIMEOUT)
    }
}

impl EmojiMenu {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { state: MenuState::Hidden, message_id: None, timeout }
    }

    #[must_use]
    pub fn state(&self) -> MenuState {
        self.state
    }

    /// Message the menu is anchored to while visible.
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        match self.state {
            MenuState::Visible { .. } => self.message_id.as_deref(),
            MenuState::Hidden => None,
        }
    }

    pub fn show(&mut self, message_id: &str) {
        self.show_at(message_id, Instant::now());
    }

    /// Open (or re-anchor) the menu. Showing again restarts the timer.
    pub fn show_at(&mut self, message_id: &str, now: Instant) {
        self.message_id = Some(message_id.to_owned());
        self.state = MenuState::Visible { since: now };
    }

    pub fn hide(&mut self) {
        self.state = MenuState::Hidden;
        self.message_id = None;
    }

    /// Advance the timer. Returns `true` when this tick hid the menu.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        match self.state {
            MenuState::Visible { since } if now.saturating_duration_since(since) >= self.timeout => {
                self.hide();
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_visible_at(&self, now: Instant) -> bool {
        match self.state {
            MenuState::Visible { since } => now.saturating_duration_since(since) < self.timeout,
            MenuState::Hidden => false,
        }
    }
}

/// Debounced "user is typing" tracking.
#[derive(Clone, Debug)]
pub struct TypingIndicator {
    last_seen: HashMap<String, Instant>,
    timeout: Duration,
}

impl Default for TypingIndicator {
    fn default() -> Self {
        Self::new(TYPING_TIMEOUT)
    }
}

impl TypingIndicator {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { last_seen: HashMap::new(), timeout }
    }

    pub fn record_at(&mut self, user: &str, now: Instant) {
        self.last_seen.insert(user.to_owned(), now);
    }

    /// A message from `user` ends their typing state immediately.
    pub fn stop(&mut self, user: &str) {
        self.last_seen.remove(user);
    }

    /// Users typing at `now`, excluding `current_user`, sorted by name.
    /// Expired entries are pruned.
    pub fn active_at(&mut self, current_user: &str, now: Instant) -> Vec<String> {
        let timeout = self.timeout;
        self.last_seen
            .retain(|_, seen| now.saturating_duration_since(*seen) < timeout);
        let mut users = self
            .last_seen
            .keys()
            .filter(|u| u.as_str() != current_user)
            .cloned()
            .collect::<Vec<_>>();
        users.sort();
        users
    }
}
