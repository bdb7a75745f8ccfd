//! Keyword mood analysis feeding the cosmetic chat theme.

#[cfg(test)]
#[path = "mood_test.rs"]
mod mood_test;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Classifications retained by [`MoodTracker`].
pub const MOOD_HISTORY_CAP: usize = 10;
/// Most recent classifications that vote on the displayed theme.
pub const MOOD_VOTE_WINDOW: usize = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Playful,
    #[default]
    Neutral,
}

const HAPPY: &[&str] = &[
    "happy", "great", "awesome", "love", "yay", "excited", "glad", "😊", "😀", "😃", "😄", "❤️", "🎉",
];
const SAD: &[&str] = &["sad", "unhappy", "miss", "cry", "crying", "lonely", "😢", "😭", "☹️", "💔"];
const ANGRY: &[&str] = &["angry", "mad", "hate", "furious", "annoyed", "ugh", "😠", "😡", "🤬"];
const PLAYFUL: &[&str] = &["lol", "haha", "lmao", "fun", "game", "play", "joke", "😜", "😂", "🤣", "🎲"];

/// Classify `text` by keyword and emoji membership.
///
/// Checks run in priority order happy, sad, angry, playful; the first match
/// wins and anything else is neutral. Word keywords match whole words only.
#[must_use]
pub fn analyze(text: &str) -> Mood {
    let lowered = text.to_lowercase();
    let words = lowered
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>();

    let matches = |keywords: &[&str]| {
        keywords.iter().any(|k| {
            if k.chars().all(char::is_alphanumeric) {
                words.contains(k)
            } else {
                lowered.contains(k)
            }
        })
    };

    if matches(HAPPY) {
        Mood::Happy
    } else if matches(SAD) {
        Mood::Sad
    } else if matches(ANGRY) {
        Mood::Angry
    } else if matches(PLAYFUL) {
        Mood::Playful
    } else {
        Mood::Neutral
    }
}

/// Rolling mood history with a majority-vote theme.
#[derive(Clone, Debug, Default)]
pub struct MoodTracker {
    history: VecDeque<Mood>,
}

impl MoodTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify the latest message text and record the result.
    pub fn observe(&mut self, text: &str) -> Mood {
        let mood = analyze(text);
        self.record(mood);
        mood
    }

    pub fn record(&mut self, mood: Mood) {
        self.history.push_back(mood);
        while self.history.len() > MOOD_HISTORY_CAP {
            self.history.pop_front();
        }
    }

    #[must_use]
    pub fn history(&self) -> Vec<Mood> {
        self.history.iter().copied().collect()
    }

    /// Majority of the last [`MOOD_VOTE_WINDOW`] classifications. Ties go to
    /// the tied mood seen most recently; an empty history is neutral.
    #[must_use]
    pub fn theme(&self) -> Mood {
        let window = self
            .history
            .iter()
            .rev()
            .take(MOOD_VOTE_WINDOW)
            .copied()
            .collect::<Vec<_>>();

        let mut best: Option<(Mood, usize)> = None;
        // `window` is newest-first, so on equal counts the earlier entry wins.
        for mood in &window {
            let count = window.iter().filter(|m| *m == mood).count();
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((*mood, count));
            }
        }
        best.map_or(Mood::Neutral, |(mood, _)| mood)
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

/// Cosmetic palette for a mood theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MoodTheme {
    pub label: &'static str,
    pub accent: &'static str,
    pub background: &'static str,
}

#[must_use]
pub fn mood_theme(mood: Mood) -> MoodTheme {
    match mood {
        Mood::Happy => MoodTheme { label: "HAPPY", accent: "#f5b700", background: "#fff8e1" },
        Mood::Sad => MoodTheme { label: "SAD", accent: "#5b9bd5", background: "#e8f1fb" },
        Mood::Angry => MoodTheme { label: "ANGRY", accent: "#e05252", background: "#fdecea" },
        Mood::Playful => MoodTheme { label: "PLAYFUL", accent: "#b388ff", background: "#f3ecff" },
        Mood::Neutral => MoodTheme { label: "NEUTRAL", accent: "#888888", background: "#ffffff" },
    }
}
