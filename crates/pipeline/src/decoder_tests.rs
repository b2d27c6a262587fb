use serde_json::json;

use super::*;

fn message(payload: serde_json::Value) -> PubSubMessage {
    PubSubMessage::from_payload(payload.to_string())
}

#[test]
fn test_decode_extracts_all_known_keys() {
    let msg = message(json!({
        "buildId": "b1",
        "status": "SUCCESS",
        "startTime": "2021-01-01T00:00:00Z",
        "finishTime": "2021-01-01T00:05:00Z",
        "projectId": "proj-1",
        "buildTriggerId": "trg-1"
    }));

    let event = decode_build_event(&msg).unwrap();

    assert_eq!(event.build_id, BuildId::new("b1"));
    assert_eq!(event.status, BuildStatus::new("SUCCESS"));
    assert_eq!(event.start_time.as_deref(), Some("2021-01-01T00:00:00Z"));
    assert_eq!(event.finish_time.as_deref(), Some("2021-01-01T00:05:00Z"));
    assert_eq!(event.project_id, ProjectId::new("proj-1"));
    assert_eq!(event.trigger_id, TriggerId::new("trg-1"));
}

#[test]
fn test_decode_treats_missing_null_and_empty_keys_as_absent() {
    let msg = message(json!({
        "status": "WORKING",
        "projectId": "p1",
        "buildTriggerId": "",
        "startTime": null
    }));

    let event = decode_build_event(&msg).unwrap();

    assert_eq!(event.status, BuildStatus::new("WORKING"));
    assert_eq!(event.project_id, ProjectId::new("p1"));
    assert!(event.build_id.is_none());
    assert!(event.trigger_id.is_none());
    assert!(event.start_time.is_none());
    assert!(event.finish_time.is_none());
}

#[test]
fn test_decode_ignores_unknown_keys_of_any_shape() {
    let msg = message(json!({
        "status": "FAILURE",
        "buildTriggerId": "t1",
        "steps": [{"name": "gcr.io/cloud-builders/docker"}],
        "source": {"repoSource": {"branchName": "main"}}
    }));

    let event = decode_build_event(&msg).unwrap();

    assert_eq!(event.trigger_id, TriggerId::new("t1"));
}

#[test]
fn test_decode_rejects_invalid_base64() {
    let msg = PubSubMessage {
        data: "not base64!!".to_string(),
        ..PubSubMessage::default()
    };

    let err = decode_build_event(&msg).unwrap_err();

    assert!(matches!(err, DecodeError::Base64(_)));
}

#[test]
fn test_decode_accepts_unpadded_base64() {
    // {"status":"SUCCESS"} with the trailing padding stripped.
    let msg = PubSubMessage {
        data: "eyJzdGF0dXMiOiJTVUNDRVNTIn0".to_string(),
        ..PubSubMessage::default()
    };

    let event = decode_build_event(&msg).unwrap();

    assert_eq!(event.status, BuildStatus::new("SUCCESS"));
}

#[test]
fn test_decode_keeps_last_value_of_repeated_key() {
    let msg = PubSubMessage::from_payload(
        r#"{"status": "WORKING", "buildTriggerId": "t1", "status": "SUCCESS"}"#,
    );

    let event = decode_build_event(&msg).unwrap();

    assert_eq!(event.status, BuildStatus::new("SUCCESS"));
    assert_eq!(event.trigger_id, TriggerId::new("t1"));
}

#[test]
fn test_decode_rejects_non_utf8_payload() {
    let msg = PubSubMessage::from_payload([0xff_u8, 0xfe, 0xfd]);

    let err = decode_build_event(&msg).unwrap_err();

    assert!(matches!(err, DecodeError::Utf8(_)));
}

#[test]
fn test_decode_rejects_malformed_json() {
    let msg = PubSubMessage::from_payload("{\"status\": ");

    let err = decode_build_event(&msg).unwrap_err();

    assert!(matches!(err, DecodeError::Json(_)));
}

#[test]
fn test_decode_rejects_non_object_payload() {
    let msg = PubSubMessage::from_payload("[1, 2, 3]");

    assert!(matches!(
        decode_build_event(&msg),
        Err(DecodeError::Json(_))
    ));
}

#[test]
fn test_decode_rejects_non_string_value_for_known_key() {
    let msg = message(json!({"status": 3}));

    assert!(matches!(
        decode_build_event(&msg),
        Err(DecodeError::Json(_))
    ));
}

#[test]
fn test_envelope_accepts_camel_and_snake_case_keys() {
    let camel: PubSubMessage = serde_json::from_value(json!({
        "data": "e30=",
        "attributes": {"buildId": "b1"},
        "messageId": "m1",
        "publishTime": "2021-01-01T00:00:00Z"
    }))
    .unwrap();
    let snake: PubSubMessage = serde_json::from_value(json!({
        "data": "e30=",
        "message_id": "m1",
        "publish_time": "2021-01-01T00:00:00Z"
    }))
    .unwrap();

    assert_eq!(camel.message_id.as_deref(), Some("m1"));
    assert_eq!(camel.attributes.get("buildId").map(String::as_str), Some("b1"));
    assert_eq!(snake.message_id.as_deref(), Some("m1"));
    assert_eq!(snake.publish_time, camel.publish_time);
}

#[test]
fn test_skip_reason_for_queued_build() {
    let event = BuildEvent {
        status: BuildStatus::new("QUEUED"),
        trigger_id: TriggerId::new("t1"),
        ..BuildEvent::default()
    };

    assert_eq!(skip_reason(&event), Some(SkipReason::Queued));
}

#[test]
fn test_skip_reason_for_build_without_trigger() {
    let event = BuildEvent {
        status: BuildStatus::new("SUCCESS"),
        ..BuildEvent::default()
    };

    assert_eq!(skip_reason(&event), Some(SkipReason::NoTrigger));
}

#[test]
fn test_triggered_build_past_queue_is_not_skipped() {
    let event = BuildEvent {
        status: BuildStatus::new("WORKING"),
        trigger_id: TriggerId::new("t1"),
        ..BuildEvent::default()
    };

    assert_eq!(skip_reason(&event), None);
}
