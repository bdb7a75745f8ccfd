use serde_json::json;

use super::*;

#[test]
fn parses_new_message_envelope() {
    let event = parse_event(&json!({
        "event": "message:new",
        "data": {"id": "m1", "sender": "ann", "timestamp": 5, "content": "hi"}
    }))
    .unwrap();
    let ChannelEvent::MessageCreated(msg) = event else {
        panic!("expected MessageCreated");
    };
    assert_eq!(msg.id, "m1");
    assert_eq!(msg.content(), "hi");
}

#[test]
fn history_accepts_bare_array_or_messages_field() {
    let bare = parse_event(&json!({
        "event": "message:history",
        "data": [{"id": "1", "sender": "a", "timestamp": 1}, {"id": "bad"}]
    }))
    .unwrap();
    let wrapped = parse_event(&json!({
        "event": "message:history",
        "data": {"messages": [{"id": "1", "sender": "a", "timestamp": 1}]}
    }))
    .unwrap();

    assert!(matches!(bare, ChannelEvent::History(ref list) if list.len() == 1));
    assert!(matches!(wrapped, ChannelEvent::History(ref list) if list.len() == 1));
}

#[test]
fn parses_reaction_events() {
    let replaced = parse_event(&json!({
        "event": "message:reactions",
        "data": {"messageId": "m1", "reactions": [{"user": "bob", "emoji": "🔥"}]}
    }))
    .unwrap();
    let toggled = parse_event(&json!({
        "event": "message:reaction",
        "data": {"message_id": "m1", "user": {"username": "ann"}, "emoji": "👍"}
    }))
    .unwrap();

    assert_eq!(
        replaced,
        ChannelEvent::ReactionsReplaced { message_id: "m1".into(), reactions: vec![Reaction::new("bob", "🔥")] }
    );
    assert_eq!(
        toggled,
        ChannelEvent::ReactionToggled { message_id: "m1".into(), reaction: Reaction::new("ann", "👍") }
    );
}

#[test]
fn parses_edit_delete_participants_and_typing() {
    let edit = parse_event(&json!({"event": "message:edit", "data": {"id": "m1", "content": "new"}})).unwrap();
    let delete = parse_event(&json!({"event": "message:delete", "data": {"message_id": 7}})).unwrap();
    let players = parse_event(&json!({
        "event": "game:participants",
        "data": {"message_id": "g1", "players": ["ann", {"username": "bob"}]}
    }))
    .unwrap();
    let typing = parse_event(&json!({"type": "typing", "payload": {"user": "bob"}})).unwrap();

    assert_eq!(edit, ChannelEvent::MessageEdited { message_id: "m1".into(), content: "new".into() });
    assert_eq!(delete, ChannelEvent::MessageDeleted { message_id: "7".into() });
    assert_eq!(
        players,
        ChannelEvent::ParticipantsUpdated { message_id: "g1".into(), participants: vec!["ann".into(), "bob".into()] }
    );
    assert_eq!(typing, ChannelEvent::Typing { user: "bob".into() });
    assert_eq!(typing.name(), "typing");
}

#[test]
fn unknown_event_and_missing_fields_error() {
    let unknown = parse_event(&json!({"event": "presence:update", "data": {}}));
    let no_name = parse_event(&json!({"data": {}}));
    let no_id = parse_event(&json!({"event": "message:delete", "data": {}}));

    assert!(matches!(unknown, Err(TimelineError::UnknownEvent(ref name)) if name == "presence:update"));
    assert!(matches!(no_name, Err(TimelineError::MissingField("event"))));
    assert!(matches!(no_id, Err(TimelineError::MissingField("message_id"))));
}
