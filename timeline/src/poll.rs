//! Poll vote tallies.

#[cfg(test)]
#[path = "poll_test.rs"]
mod poll_test;

use serde::Serialize;

use crate::message::PollOption;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OptionTally {
    pub text: String,
    pub votes: usize,
    /// Share of all votes, 0.0 to 100.0.
    pub percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PollTally {
    pub options: Vec<OptionTally>,
    pub total_votes: usize,
    /// Index of the option the current user voted for.
    pub my_vote: Option<usize>,
}

#[must_use]
pub fn tally(options: &[PollOption], current_user: &str) -> PollTally {
    let total_votes = options.iter().map(|o| o.votes.len()).sum::<usize>();
    let options_out = options
        .iter()
        .map(|o| OptionTally {
            text: o.text.clone(),
            votes: o.votes.len(),
            percent: percent_of(o.votes.len(), total_votes),
        })
        .collect();
    let my_vote = options
        .iter()
        .position(|o| o.votes.iter().any(|v| v == current_user));

    PollTally { options: options_out, total_votes, my_vote }
}

#[allow(clippy::cast_precision_loss)]
fn percent_of(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / total as f64
}
