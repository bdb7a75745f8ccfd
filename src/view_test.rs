use super::*;
use timeline::message::PollOption;
use timeline::{ErrorRecovery, Reaction};

fn options(user: &str) -> ViewOptions {
    ViewOptions { current_user: user.into(), ..ViewOptions::default() }
}

fn with_reactions(id: &str, reactions: &[(&str, &str)]) -> Message {
    let mut message = Message::text(id, "alice", 1_000, "hi");
    message.reactions = reactions.iter().map(|(u, e)| Reaction::new(u, e)).collect();
    message
}

// =============================================================================
// Clusters and render modes
// =============================================================================

#[test]
fn groups_messages_into_clusters() {
    let messages = vec![
        Message::text("1", "alice", 0, "morning"),
        Message::text("2", "alice", 60_000, "anyone around?"),
        Message::text("3", "bob", 120_000, "here"),
    ];
    let view = build_view(&messages, &JoinTracker::default(), &MoodTracker::new(), &options("bob"));

    assert_eq!(view.clusters.len(), 2);
    assert_eq!(view.clusters[0].sender.as_deref(), Some("alice"));
    assert_eq!(view.clusters[0].started_at, Some(0));
    assert_eq!(view.clusters[0].messages.len(), 2);
    assert_eq!(view.clusters[1].messages[0].id, "3");
}

#[test]
fn text_messages_carry_linkified_segments() {
    let messages = vec![Message::text("1", "alice", 0, "see https://example.test")];
    let view = build_view(&messages, &JoinTracker::default(), &MoodTracker::new(), &options("bob"));

    let message = &view.clusters[0].messages[0];
    assert_eq!(message.render, RenderMode::Text);
    assert!(message.text.iter().any(|s| matches!(s, TextSegment::Link(_))));
}

#[test]
fn poll_messages_carry_a_tally() {
    let body = MessageBody::Poll {
        question: "Lunch?".into(),
        options: vec![
            PollOption { text: "pizza".into(), votes: vec!["bob".into()] },
            PollOption { text: "tacos".into(), votes: vec![] },
        ],
    };
    let messages = vec![Message::with_body("p", "alice", 0, body)];
    let view = build_view(&messages, &JoinTracker::default(), &MoodTracker::new(), &options("bob"));

    let message = &view.clusters[0].messages[0];
    assert_eq!(message.render, RenderMode::Poll);
    assert!(message.text.is_empty());
    let poll = message.poll.as_ref().unwrap();
    assert_eq!(poll.total_votes, 1);
    assert_eq!(poll.my_vote, Some(0));
}

// =============================================================================
// Reactions
// =============================================================================

#[test]
fn unhovered_message_shows_only_own_reactions() {
    let messages = vec![with_reactions("1", &[("bob", "👍"), ("carol", "🎉")])];
    let view = build_view(&messages, &JoinTracker::default(), &MoodTracker::new(), &options("bob"));

    let chips = &view.clusters[0].messages[0].reactions;
    assert_eq!(chips.len(), 1);
    assert_eq!(chips[0].emoji, "👍");
    assert!(chips[0].mine);
}

#[test]
fn hovered_message_shows_everyone_and_compacts() {
    let messages = vec![with_reactions(
        "1",
        &[("a", "👍"), ("b", "🎉"), ("c", "😂"), ("d", "🔥"), ("e", "❤️")],
    )];
    let mut opts = options("bob");
    opts.hovered = Some("1".into());
    let view = build_view(&messages, &JoinTracker::default(), &MoodTracker::new(), &opts);

    let message = &view.clusters[0].messages[0];
    assert_eq!(message.reactions.len(), 3);
    let overflow = message.reaction_overflow.as_ref().unwrap();
    assert_eq!(overflow.hidden, 2);
    assert_eq!(overflow.anchor_message_id, "1");
}

#[test]
fn compaction_can_be_disabled() {
    let messages = vec![with_reactions(
        "1",
        &[("a", "👍"), ("b", "🎉"), ("c", "😂"), ("d", "🔥")],
    )];
    let mut opts = options("bob");
    opts.hover_all = true;
    opts.preferences.compact_reactions = false;
    let view = build_view(&messages, &JoinTracker::default(), &MoodTracker::new(), &opts);

    let message = &view.clusters[0].messages[0];
    assert_eq!(message.reactions.len(), 4);
    assert!(message.reaction_overflow.is_none());
}

// =============================================================================
// Join flags and mood theme
// =============================================================================

#[test]
fn joining_flag_follows_tracker() {
    let messages = vec![Message::text("g1", "alice", 0, "let's play")];
    let mut joins = JoinTracker::new(ErrorRecovery::ClearAll);
    joins.begin_join("g1");
    let view = build_view(&messages, &joins, &MoodTracker::new(), &options("bob"));

    assert!(view.clusters[0].messages[0].joining);
    assert_eq!(view.joining, vec!["g1".to_owned()]);
}

#[test]
fn theme_follows_mood_history_when_enabled() {
    let mut moods = MoodTracker::new();
    moods.observe("this is great, love it");
    let view = build_view(&[], &JoinTracker::default(), &moods, &options("bob"));
    assert_eq!(view.theme.map(|t| t.label), Some("HAPPY"));

    let mut opts = options("bob");
    opts.preferences.mood_theme = false;
    let view = build_view(&[], &JoinTracker::default(), &moods, &opts);
    assert!(view.theme.is_none());
}

#[test]
fn view_serializes_to_json() {
    let messages = vec![Message::text("1", "alice", 0, "hello")];
    let view = build_view(&messages, &JoinTracker::default(), &MoodTracker::new(), &options("bob"));
    let json = serde_json::to_value(&view).unwrap();

    assert_eq!(json["clusters"][0]["messages"][0]["render"]["mode"], "text");
    assert_eq!(json["clusters"][0]["messages"][0]["id"], "1");
}
