// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;
use serde_json::json;

#[test]
fn serialize_emits_fields_in_wire_order() {
    let msg = Message::new(Method::Status, State::Active);
    assert_eq!(msg.to_json(), r#"{"method":"status","state":"active","data":null}"#);

    let msg = Message::with_data(Method::Trigger, State::On, json!("INACTIVE"));
    assert_eq!(msg.to_json(), r#"{"method":"trigger","state":"on","data":"INACTIVE"}"#);
}

#[test]
fn parse_is_case_insensitive() {
    let msg = Message::parse(r#"{"method": "STATUS", "state": "Active", "data": null}"#).unwrap();
    assert_eq!(msg.method, Method::Status);
    assert_eq!(msg.state, State::Active);
    assert_eq!(msg.data, json!(null));

    let msg = Message::parse(r#"{"method": "trigger", "state": "on", "data": 3}"#).unwrap();
    assert_eq!(msg.method, Method::Trigger);
    assert_eq!(msg.state, State::On);
    assert_eq!(msg.data, json!(3));
}

#[test]
fn invalid_json_degrades_to_message() {
    let msg = Message::parse(r#"{"method":"STATUS","state":"Invalid"#).unwrap();
    assert_eq!(msg.method, Method::Message);
    assert_eq!(msg.state, State::None);
    assert_eq!(msg.data, json!(r#"{"method":"STATUS","state":"Invalid"#));
}

#[test]
fn plain_text_degrades_to_message() {
    let msg = Message::parse("hello there").unwrap();
    assert_eq!(msg.method, Method::Message);
    assert_eq!(msg.data, json!("hello there"));
}

#[test]
fn unknown_method_names_the_value() {
    let err = Message::parse(r#"{"method": "PING", "state": "on"}"#).unwrap_err();
    assert_eq!(err, MessageError::InvalidMethod("PING".into()));
}

#[test]
fn unknown_state_names_the_value() {
    let err = Message::parse(r#"{"method": "STATUS", "state": "Invalid"}"#).unwrap_err();
    assert_eq!(err, MessageError::InvalidState("Invalid".into()));
}

#[test]
fn missing_method_is_an_error() {
    let err = Message::parse(r#"{"state": "on"}"#).unwrap_err();
    assert_eq!(err, MessageError::MissingField("method"));
}

#[test]
fn non_object_json_is_an_error() {
    let err = Message::parse("42").unwrap_err();
    assert_eq!(err, MessageError::MissingField("method"));
}

#[test]
fn missing_state_allowed_only_for_message_method() {
    let msg = Message::parse(r#"{"method": "message", "data": "hi"}"#).unwrap();
    assert_eq!(msg.state, State::None);
    assert_eq!(msg.data, json!("hi"));

    let err = Message::parse(r#"{"method": "status", "data": "hi"}"#).unwrap_err();
    assert_eq!(err, MessageError::MissingField("state"));
}

#[test]
fn missing_data_defaults_to_null() {
    let msg = Message::parse(r#"{"method": "trigger", "state": "off"}"#).unwrap();
    assert_eq!(msg.data, json!(null));
}

fn method_strategy() -> impl Strategy<Value = Method> {
    prop_oneof![Just(Method::Message), Just(Method::Status), Just(Method::Trigger)]
}

fn state_strategy() -> impl Strategy<Value = State> {
    prop_oneof![
        Just(State::Off),
        Just(State::On),
        Just(State::Inactive),
        Just(State::Active),
        Just(State::Solved),
        Just(State::Failed),
        Just(State::None),
    ]
}

proptest! {
    #[test]
    fn canonical_round_trip(method in method_strategy(), state in state_strategy(), data in "[a-z0-9 ]{0,16}") {
        let msg = Message::with_data(method, state, json!(data));
        let parsed = Message::parse(&msg.to_json()).unwrap();
        prop_assert_eq!(parsed, msg);
    }
}
