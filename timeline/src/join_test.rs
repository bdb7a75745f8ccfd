use super::*;

fn game(id: &str, participants: &[&str]) -> Message {
    let mut msg = Message::text(id, "system", 1, "Ludo game");
    msg.game_type = Some("ludo".to_owned());
    msg.participants = Some(participants.iter().map(|p| (*p).to_owned()).collect());
    msg
}

fn error(id: &str, parent: Option<&str>) -> Message {
    let mut msg = Message::text(id, "system", 2, "could not join");
    msg.event_type = Some("game_error".to_owned());
    msg.parent_message_id = parent.map(str::to_owned);
    msg
}

// =============================================================
// begin_join
// =============================================================

#[test]
fn begin_join_is_guarded_while_in_progress() {
    let mut tracker = JoinTracker::default();
    assert_eq!(tracker.state("g1"), JoinState::Idle);
    assert!(tracker.begin_join("g1"));
    assert!(!tracker.begin_join("g1"));
    assert_eq!(tracker.state("g1"), JoinState::Joining);
    assert_eq!(tracker.pending(), vec!["g1".to_owned()]);
}

// =============================================================
// reconcile
// =============================================================

#[test]
fn participant_confirmation_clears_only_that_message() {
    let mut tracker = JoinTracker::default();
    tracker.begin_join("g1");
    tracker.begin_join("g2");

    let released = tracker.reconcile(&[game("g1", &["bob", "ann"]), game("g2", &["bob"])], "ann");
    assert_eq!(released, vec!["g1".to_owned()]);
    assert!(!tracker.is_joining("g1"));
    assert!(tracker.is_joining("g2"));
}

#[test]
fn confirmation_through_associated_game_message() {
    let mut tracker = JoinTracker::default();
    tracker.begin_join("invite");

    let mut state = game("state-1", &["ann"]);
    state.parent_message_id = Some("invite".to_owned());
    tracker.reconcile(&[Message::text("invite", "bob", 0, "join my game"), state], "ann");

    assert!(!tracker.is_joining("invite"));
}

#[test]
fn unconfirmed_join_stays_set_without_errors() {
    let mut tracker = JoinTracker::default();
    tracker.begin_join("g1");
    let released = tracker.reconcile(&[game("g1", &["bob"])], "ann");
    assert!(released.is_empty());
    assert!(tracker.is_joining("g1"));
}

#[test]
fn any_error_message_clears_all_flags() {
    let mut tracker = JoinTracker::default();
    tracker.begin_join("g1");
    tracker.begin_join("g2");

    let released = tracker.reconcile(&[error("e1", Some("g1"))], "ann");
    assert_eq!(released, vec!["g1".to_owned(), "g2".to_owned()]);
    assert!(tracker.pending().is_empty());
}

#[test]
fn an_error_is_acted_on_once() {
    let mut tracker = JoinTracker::default();
    tracker.begin_join("g1");
    let list = vec![error("e1", None)];
    tracker.reconcile(&list, "ann");

    tracker.begin_join("g1");
    tracker.reconcile(&list, "ann");
    assert!(tracker.is_joining("g1"));
}

#[test]
fn correlated_recovery_clears_only_named_join() {
    let mut tracker = JoinTracker::new(ErrorRecovery::Correlated);
    tracker.begin_join("g1");
    tracker.begin_join("g2");

    tracker.reconcile(&[error("e1", Some("g1"))], "ann");
    assert!(!tracker.is_joining("g1"));
    assert!(tracker.is_joining("g2"));

    tracker.reconcile(&[error("e1", Some("g1")), error("e2", None)], "ann");
    assert!(!tracker.is_joining("g2"));
}

#[test]
fn clear_resets_everything() {
    let mut tracker = JoinTracker::default();
    tracker.begin_join("g1");
    tracker.reconcile(&[error("e1", None)], "ann");
    tracker.begin_join("g2");
    tracker.clear();
    assert!(tracker.pending().is_empty());

    // Seen errors are forgotten too, so the old error applies again.
    tracker.begin_join("g3");
    tracker.reconcile(&[error("e1", None)], "ann");
    assert!(!tracker.is_joining("g3"));
}
