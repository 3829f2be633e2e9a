//! Integration tests for the chat client against a recording peer.

use roster_chat::{ChannelResults, ChatClient, ChatConfig, ChatListener, FriendStatus, Message};
use roster_protocol::codes::chat::{event, operation, parameter};
use roster_protocol::{
    ConnectionState, EventData, OperationResponse, ParamSequence, UserStatus,
    Value,
};
use roster_session::{InboundHandler, Peer, SessionError};

// =========================================================================
// Test doubles
// =========================================================================

#[derive(Default)]
struct RecordingPeer {
    sent: Vec<(u8, ParamSequence)>,
}

impl Peer for RecordingPeer {
    fn send_operation(
        &mut self,
        code: u8,
        params: ParamSequence,
    ) -> Result<(), SessionError> {
        self.sent.push((code, params));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingListener {
    chat: Vec<(String, Vec<Message>)>,
    private: Vec<(String, Message)>,
    subscribed: Vec<ChannelResults>,
    unsubscribed: Vec<ChannelResults>,
    statuses: Vec<FriendStatus>,
    friends: Vec<Vec<String>>,
    user_counts: Vec<(String, i32)>,
    responses: Vec<u8>,
    custom: Vec<u8>,
    states: Vec<ConnectionState>,
}

impl ChatListener for RecordingListener {
    fn on_state_change(&mut self, state: ConnectionState) {
        self.states.push(state);
    }
    fn on_chat_messages(&mut self, channel: &str, messages: &[Message]) {
        self.chat.push((channel.to_string(), messages.to_vec()));
    }
    fn on_private_message(&mut self, channel: &str, message: &Message) {
        self.private.push((channel.to_string(), message.clone()));
    }
    fn on_subscribed(&mut self, results: &ChannelResults) {
        self.subscribed.push(results.clone());
    }
    fn on_unsubscribed(&mut self, results: &ChannelResults) {
        self.unsubscribed.push(results.clone());
    }
    fn on_status_update(&mut self, status: &FriendStatus) {
        self.statuses.push(status.clone());
    }
    fn on_friends_list(&mut self, friends: &[String]) {
        self.friends.push(friends.to_vec());
    }
    fn on_user_count(&mut self, channel: &str, count: i32) {
        self.user_counts.push((channel.to_string(), count));
    }
    fn on_operation_response(&mut self, response: &OperationResponse) {
        self.responses.push(response.code);
    }
    fn on_event(&mut self, event: &EventData) {
        self.custom.push(event.code);
    }
}

type Client = ChatClient<RecordingPeer, RecordingListener>;

// =========================================================================
// Helpers
// =========================================================================

fn texts(items: &[&str]) -> Value {
    items.iter().copied().collect()
}

fn connected_client() -> Client {
    let mut client = ChatClient::new(
        RecordingPeer::default(),
        RecordingListener::default(),
        ChatConfig::with_user_id("u1"),
    );
    client.on_state_change(ConnectionState::ConnectedToFrontEnd);
    client
}

fn subscribe_event(names: &[&str], results: &[bool]) -> EventData {
    EventData::new(event::SUBSCRIBE)
        .with(parameter::CHANNELS, texts(names))
        .with(
            parameter::SUBSCRIBE_RESULTS,
            results.iter().copied().collect::<Value>(),
        )
}

fn messages_event(channel: &str, senders: &[&str], messages: &[&str]) -> EventData {
    EventData::new(event::CHAT_MESSAGES)
        .with(parameter::CHANNEL, channel)
        .with(parameter::SENDERS, texts(senders))
        .with(parameter::MESSAGES, texts(messages))
}

/// A connected client subscribed to "general".
fn subscribed_client() -> Client {
    let mut client = connected_client();
    client.on_event(subscribe_event(&["general"], &[true]));
    client
}

fn sent(client: &Client) -> &[(u8, ParamSequence)] {
    &client.core().peer().sent
}

// =========================================================================
// State gating
// =========================================================================

#[test]
fn test_every_operation_before_connect_is_refused_without_sending() {
    let mut client = ChatClient::new(
        RecordingPeer::default(),
        RecordingListener::default(),
        ChatConfig::with_user_id("u1"),
    );
    client.on_state_change(ConnectionState::ConnectedToNameServer);

    let results = [
        client.subscribe(&["a"], None),
        client.unsubscribe(&["a"]),
        client.publish("a", "hi"),
        client.send_private("u2", "hi"),
        client.channel_history("a", 10),
        client.update_status(UserStatus::Away, None, false),
        client.add_friends(&["u2"]),
        client.remove_friends(&["u2"]),
    ];

    for result in results {
        assert!(matches!(result, Err(SessionError::NotAdmitted { .. })));
    }
    assert!(sent(&client).is_empty());
}

#[test]
fn test_validation_failures_return_invalid_argument() {
    let mut client = connected_client();

    assert!(matches!(
        client.subscribe(&[], None),
        Err(SessionError::InvalidArgument { .. })
    ));
    assert!(matches!(
        client.unsubscribe(&["ok", ""]),
        Err(SessionError::InvalidArgument { .. })
    ));
    assert!(client.publish("", "hi").is_err());
    assert!(client.send_private("", "hi").is_err());
    assert!(client.channel_history("general", 0).is_err());
    assert!(client.add_friends(&[]).is_err());
    assert!(client
        .update_status(UserStatus::Online, Some(Value::from("x")), true)
        .is_err());
    assert!(sent(&client).is_empty());
}

// =========================================================================
// Encoding
// =========================================================================

#[test]
fn test_subscribe_uses_config_history_default() {
    let mut client = ChatClient::new(
        RecordingPeer::default(),
        RecordingListener::default(),
        ChatConfig {
            default_history_length: Some(25),
            ..ChatConfig::with_user_id("u1")
        },
    );
    client.on_state_change(ConnectionState::ConnectedToFrontEnd);

    client.subscribe(&["a", "b"], None).unwrap();
    client.subscribe(&["c"], Some(5)).unwrap();

    let (code, params) = &sent(&client)[0];
    assert_eq!(*code, operation::SUBSCRIBE);
    assert_eq!(params.codes(), vec![parameter::CHANNELS, parameter::HISTORY_LENGTH]);
    assert_eq!(params.get(parameter::CHANNELS), Some(&texts(&["a", "b"])));
    assert_eq!(params.get(parameter::HISTORY_LENGTH), Some(&Value::Int(25)));
    assert_eq!(sent(&client)[1].1.get(parameter::HISTORY_LENGTH), Some(&Value::Int(5)));
}

#[test]
fn test_subscribe_without_history_omits_code() {
    let mut client = connected_client();

    client.subscribe(&["a"], None).unwrap();

    assert_eq!(sent(&client)[0].1.codes(), vec![parameter::CHANNELS]);
}

#[test]
fn test_publish_and_send_private_param_order() {
    let mut client = connected_client();

    client.publish("general", "hello").unwrap();
    client.send_private("u2", "psst").unwrap();

    assert_eq!(sent(&client)[0].0, operation::PUBLISH);
    assert_eq!(sent(&client)[0].1.codes(), vec![parameter::CHANNEL, parameter::MESSAGE]);
    assert_eq!(sent(&client)[1].0, operation::SEND_PRIVATE);
    assert_eq!(sent(&client)[1].1.codes(), vec![parameter::USER_ID, parameter::MESSAGE]);
}

#[test]
fn test_update_status_skip_message_replaces_message() {
    let mut client = connected_client();

    client.update_status(UserStatus::Dnd, None, true).unwrap();
    client
        .update_status(UserStatus::Online, Some(Value::from("back")), false)
        .unwrap();
    client.update_status(UserStatus::Away, None, false).unwrap();

    let skip = &sent(&client)[0].1;
    assert_eq!(skip.codes(), vec![parameter::STATUS, parameter::SKIP_MESSAGE]);
    assert_eq!(skip.get(parameter::STATUS), Some(&Value::Int(4)));
    assert_eq!(skip.get(parameter::SKIP_MESSAGE), Some(&Value::Bool(true)));

    assert_eq!(sent(&client)[1].1.codes(), vec![parameter::STATUS, parameter::MESSAGE]);
    assert_eq!(sent(&client)[2].1.codes(), vec![parameter::STATUS]);
}

#[test]
fn test_friend_operations_emit_friends_list() {
    let mut client = connected_client();

    client.add_friends(&["u2", "u3"]).unwrap();
    client.remove_friends(&["u3"]).unwrap();

    assert_eq!(sent(&client)[0].0, operation::ADD_FRIENDS);
    assert_eq!(sent(&client)[0].1.get(parameter::FRIENDS), Some(&texts(&["u2", "u3"])));
    assert_eq!(sent(&client)[1].0, operation::REMOVE_FRIENDS);
}

#[test]
fn test_operations_never_touch_cache() {
    let mut client = connected_client();

    client.subscribe(&["general"], None).unwrap();
    client.send_private("u2", "hi").unwrap();

    assert!(client.cache().public_channels().is_empty());
    assert!(client.cache().private_channels().is_empty());
}

// =========================================================================
// Subscribe / unsubscribe
// =========================================================================

#[test]
fn test_subscribe_results_are_zipped_per_channel() {
    let mut client = connected_client();

    client.on_event(subscribe_event(&["a", "b", "c"], &[true, false, true]));

    let expected: ChannelResults = [("a", true), ("b", false), ("c", true)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    assert_eq!(client.listener().subscribed, vec![expected]);
    assert_eq!(client.cache().public_channels(), vec!["a", "c"]);
    assert!(!client.cache().is_subscribed("b"));
}

#[test]
fn test_subscribe_missing_result_entry_counts_as_failure() {
    let mut client = connected_client();

    client.on_event(subscribe_event(&["a", "b"], &[true]));

    let results = &client.listener().subscribed[0];
    assert_eq!(results.get("a"), Some(&true));
    assert_eq!(results.get("b"), Some(&false));
    assert_eq!(client.cache().public_channels(), vec!["a"]);
}

#[test]
fn test_subscribe_results_use_truthiness_not_strict_bool() {
    let mut client = connected_client();

    client.on_event(
        EventData::new(event::SUBSCRIBE)
            .with(parameter::CHANNELS, texts(&["a", "b", "c"]))
            .with(
                parameter::SUBSCRIBE_RESULTS,
                Value::Array(vec![Value::Int(1), Value::Int(0), Value::Null]),
            ),
    );

    let results = &client.listener().subscribed[0];
    assert_eq!(results.get("a"), Some(&true));
    assert_eq!(results.get("b"), Some(&false));
    assert_eq!(results.get("c"), Some(&false));
    assert_eq!(client.cache().public_channels(), vec!["a"]);
}

#[test]
fn test_unsubscribe_removes_all_and_reports_success() {
    let mut client = connected_client();
    client.on_event(subscribe_event(&["a", "b", "c"], &[true, true, true]));

    client.on_event(
        EventData::new(event::UNSUBSCRIBE)
            .with(parameter::CHANNELS, texts(&["a", "c"]))
            .with(parameter::SUBSCRIBE_RESULTS, Value::from_iter([false, false])),
    );

    let results = &client.listener().unsubscribed[0];
    assert_eq!(results.len(), 2);
    assert!(results.values().all(|ok| *ok));
    assert_eq!(client.cache().public_channels(), vec!["b"]);
}

#[test]
fn test_unsubscribed_channel_is_not_resurrected_by_messages() {
    let mut client = subscribed_client();
    client.on_event(
        EventData::new(event::UNSUBSCRIBE).with(parameter::CHANNELS, texts(&["general"])),
    );

    client.on_event(messages_event("general", &["x"], &["late"]));

    assert!(client.cache().public_channel("general").is_none());
    assert!(client.listener().chat.is_empty());
}

// =========================================================================
// Messages
// =========================================================================

#[test]
fn test_chat_messages_truncate_to_shorter_array() {
    let mut client = subscribed_client();

    client.on_event(messages_event("general", &["x", "y", "z"], &["m1", "m2"]));

    let expected = vec![
        Message::new("x", Value::from("m1")),
        Message::new("y", Value::from("m2")),
    ];
    let channel = client.cache().public_channel("general").unwrap();
    assert_eq!(channel.messages(), expected.as_slice());
    assert_eq!(client.listener().chat, vec![("general".to_string(), expected)]);
}

#[test]
fn test_chat_messages_for_unknown_channel_are_dropped() {
    let mut client = subscribed_client();

    client.on_event(messages_event("elsewhere", &["x"], &["m1"]));

    assert!(client.cache().public_channel("elsewhere").is_none());
    assert!(client.listener().chat.is_empty());
}

#[test]
fn test_chat_messages_keep_arrival_order() {
    let mut client = subscribed_client();

    client.on_event(messages_event("general", &["b"], &["second"]));
    client.on_event(messages_event("general", &["a"], &["first?"]));

    let senders: Vec<&str> = client
        .cache()
        .public_channel("general")
        .unwrap()
        .messages()
        .iter()
        .map(|m| m.sender.as_str())
        .collect();
    assert_eq!(senders, vec!["b", "a"]);
}

#[test]
fn test_clear_messages_then_reapply_is_identical() {
    let mut client = subscribed_client();
    client.on_event(messages_event("general", &["x", "y"], &["m1", "m2"]));
    let original = client.cache().public_channel("general").unwrap().messages().to_vec();

    assert!(client.clear_messages("general"));
    client.on_event(messages_event("general", &["x", "y"], &["m1", "m2"]));

    let again = client.cache().public_channel("general").unwrap().messages();
    assert_eq!(again, original.as_slice());
}

#[test]
fn test_history_response_appends_through_zip_path() {
    let mut client = subscribed_client();
    client.channel_history("general", 2).unwrap();

    client.on_operation_response(
        OperationResponse::ok(operation::CHANNEL_HISTORY)
            .with(parameter::CHANNEL, "general")
            .with(parameter::SENDERS, texts(&["x", "y"]))
            .with(parameter::MESSAGES, texts(&["old1", "old2"])),
    );

    let channel = client.cache().public_channel("general").unwrap();
    assert_eq!(channel.messages().len(), 2);
    assert_eq!(client.listener().chat.len(), 1);
    assert_eq!(client.listener().responses, vec![operation::CHANNEL_HISTORY]);
    assert!(!client.core().is_pending(operation::CHANNEL_HISTORY));
}

#[test]
fn test_error_response_is_reported_without_cache_change() {
    let mut client = subscribed_client();

    client.on_operation_response(
        OperationResponse::error(operation::CHANNEL_HISTORY, 1, "nope")
            .with(parameter::CHANNEL, "general")
            .with(parameter::SENDERS, texts(&["x"]))
            .with(parameter::MESSAGES, texts(&["m"])),
    );

    assert!(client.cache().public_channel("general").unwrap().messages().is_empty());
    assert_eq!(client.listener().responses, vec![operation::CHANNEL_HISTORY]);
}

#[test]
fn test_unhandled_response_is_forwarded() {
    let mut client = subscribed_client();

    client.on_operation_response(OperationResponse::ok(operation::PUBLISH));

    assert_eq!(client.listener().responses, vec![operation::PUBLISH]);
    assert!(client.cache().public_channel("general").unwrap().messages().is_empty());
}

// =========================================================================
// Private messages
// =========================================================================

#[test]
fn test_private_message_from_other_is_keyed_by_sender() {
    let mut client = connected_client();

    client.on_event(
        EventData::new(event::PRIVATE_MESSAGE)
            .with(parameter::SENDER, "u2")
            .with(parameter::USER_ID, "u1")
            .with(parameter::MESSAGE, "hi"),
    );

    let channel = client.cache().private_channel("u2").expect("created lazily");
    assert!(channel.is_private());
    assert_eq!(channel.messages(), &[Message::new("u2", Value::from("hi"))]);
    assert_eq!(client.listener().private[0].0, "u2");
}

#[test]
fn test_private_message_from_self_is_keyed_by_target() {
    let mut client = connected_client();

    client.on_event(
        EventData::new(event::PRIVATE_MESSAGE)
            .with(parameter::SENDER, "u1")
            .with(parameter::USER_ID, "u3")
            .with(parameter::MESSAGE, "yo"),
    );

    assert!(client.cache().private_channel("u3").is_some());
    assert!(client.cache().private_channel("u1").is_none());
    assert_eq!(
        client.listener().private,
        vec![("u3".to_string(), Message::new("u1", Value::from("yo")))]
    );
}

// =========================================================================
// Status, friends, users, unknown
// =========================================================================

#[test]
fn test_status_update_has_message_follows_field_presence() {
    let mut client = connected_client();

    client.on_event(
        EventData::new(event::STATUS_UPDATE)
            .with(parameter::SENDER, "u2")
            .with(parameter::STATUS, 3),
    );
    client.on_event(
        EventData::new(event::STATUS_UPDATE)
            .with(parameter::SENDER, "u3")
            .with(parameter::STATUS, 42)
            .with(parameter::MESSAGE, Value::Null),
    );

    let statuses = &client.listener().statuses;
    assert_eq!(statuses[0].status, UserStatus::Away);
    assert!(!statuses[0].has_message);
    assert_eq!(statuses[1].status, UserStatus::Custom(42));
    assert!(statuses[1].has_message);
    assert_eq!(statuses[1].message, Some(Value::Null));
    assert!(client.cache().private_channels().is_empty());
}

#[test]
fn test_friends_list_and_user_count_fire_hooks() {
    let mut client = connected_client();

    client.on_event(
        EventData::new(event::FRIENDS_LIST).with(parameter::FRIENDS, texts(&["u2", "u3"])),
    );
    client.on_event(
        EventData::new(event::USERS)
            .with(parameter::CHANNEL, "general")
            .with(parameter::CHANNEL_USER_COUNT, 12),
    );

    assert_eq!(client.listener().friends, vec![vec!["u2".to_string(), "u3".to_string()]]);
    assert_eq!(client.listener().user_counts, vec![("general".to_string(), 12)]);
}

#[test]
fn test_unknown_event_is_forwarded() {
    let mut client = connected_client();

    client.on_event(EventData::new(77).with(parameter::MESSAGE, "custom"));

    assert_eq!(client.listener().custom, vec![77]);
}

#[test]
fn test_malformed_private_message_is_dropped() {
    let mut client = connected_client();

    client.on_event(EventData::new(event::PRIVATE_MESSAGE).with(parameter::SENDER, "u2"));

    assert!(client.cache().private_channels().is_empty());
    assert!(client.listener().private.is_empty());
}

// =========================================================================
// Connection state
// =========================================================================

#[test]
fn test_disconnect_leaves_cache_until_cleared() {
    let mut client = subscribed_client();

    client.on_state_change(ConnectionState::Disconnected);

    assert_eq!(client.cache().public_channels(), vec!["general"]);
    assert_eq!(client.listener().states.last(), Some(&ConnectionState::Disconnected));

    client.clear_cache();
    assert!(client.cache().public_channels().is_empty());
}

#[test]
fn test_guest_user_id_when_unconfigured() {
    let client = ChatClient::new(RecordingPeer::default(), (), ChatConfig::default());
    assert!(client.user_id().starts_with("guest-"));
}
