// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn publish_defaults_to_qos2_unretained() {
    let fx = Effect::publish("4/door/entrance", "{}");
    assert_eq!(
        fx,
        Effect::Publish {
            topic: "4/door/entrance".into(),
            payload: "{}".into(),
            qos: Qos::ExactlyOnce,
            retain: false,
        }
    );
}

#[test]
fn publish_with_overrides_delivery() {
    let fx = Effect::publish_with("op/gameState", "{}", Qos::AtMostOnce, true);
    let Effect::Publish { qos, retain, .. } = fx else {
        panic!("expected publish");
    };
    assert_eq!(qos, Qos::AtMostOnce);
    assert!(retain);
}

#[yare::parameterized(
    publish     = { Effect::publish("t", "p"), "publish" },
    subscribe   = { Effect::subscribe("t"), "subscribe" },
    unsubscribe = { Effect::unsubscribe("t"), "unsubscribe" },
)]
fn names(fx: Effect, name: &str) {
    assert_eq!(fx.name(), name);
    assert!(fx.fields().iter().any(|(k, v)| *k == "topic" && v == "t"));
}
