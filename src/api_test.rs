use serde_json::json;

use super::*;

#[test]
fn messages_url_joins_base_and_room() {
    assert_eq!(messages_url("http://a.test/", "room-1").unwrap().as_str(), "http://a.test/messages/room-1");
    assert_eq!(messages_url("http://a.test/api", "r").unwrap().as_str(), "http://a.test/api/messages/r");
}

#[test]
fn messages_url_percent_encodes_room_id() {
    assert_eq!(messages_url("http://a.test", "room 1").unwrap().as_str(), "http://a.test/messages/room%201");
    assert_eq!(messages_url("http://a.test", "a/b").unwrap().as_str(), "http://a.test/messages/a%2Fb");
    assert_ne!(
        messages_url("http://a.test", "room 1").unwrap(),
        messages_url("http://a.test", "room1").unwrap()
    );
}

#[test]
fn messages_url_rejects_empty_room_and_bad_base() {
    assert!(matches!(messages_url("http://a.test", ""), Err(CliError::MissingField("room"))));
    assert!(matches!(messages_url("not a url", "r"), Err(CliError::InvalidBaseUrl(_))));
}

#[test]
fn extract_messages_accepts_array_or_wrapper() {
    let bare = extract_messages(json!([{"id": "1"}, {"id": "2"}])).unwrap();
    let wrapped = extract_messages(json!({"messages": [{"id": "1"}], "next": null})).unwrap();
    assert_eq!(bare.len(), 2);
    assert_eq!(wrapped.len(), 1);
}

#[test]
fn extract_messages_rejects_other_shapes() {
    assert!(matches!(extract_messages(json!({"data": []})), Err(CliError::MissingField("messages"))));
    assert!(matches!(extract_messages(json!("nope")), Err(CliError::MissingField("messages"))));
}
