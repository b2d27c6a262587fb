use super::*;
use crate::{BuildStatus, ProjectId, TriggerId};

fn widgets(message: &ChatMessage) -> Vec<(String, String)> {
    assert_eq!(message.cards.len(), 1);
    assert_eq!(message.cards[0].sections.len(), 1);
    message.cards[0].sections[0]
        .widgets
        .iter()
        .map(|w| (w.label().to_string(), w.content().to_string()))
        .collect()
}

fn contents(message: &ChatMessage) -> Vec<String> {
    widgets(message).into_iter().map(|(_, content)| content).collect()
}

fn complete_event() -> BuildEvent {
    BuildEvent {
        build_id: None,
        project_id: ProjectId::new("p1"),
        trigger_id: TriggerId::new("t1"),
        status: BuildStatus::new("SUCCESS"),
        start_time: Some("S".to_string()),
        finish_time: Some("F".to_string()),
    }
}

#[test]
fn test_all_values_present_render_in_fixed_order() {
    let trigger = TriggerMetadata {
        name: Some("Deploy".to_string()),
        branch_name: Some("main".to_string()),
    };

    let message = format_message(&complete_event(), Some(&trigger));

    assert_eq!(
        widgets(&message),
        vec![
            ("Project id".to_string(), "p1".to_string()),
            ("Trigger Name".to_string(), "Deploy".to_string()),
            ("Branch Name".to_string(), "main".to_string()),
            ("Status".to_string(), "SUCCESS".to_string()),
            ("Start Time".to_string(), "S".to_string()),
            ("Finish Time".to_string(), "F".to_string()),
        ]
    );
}

#[test]
fn test_absent_trigger_renders_placeholders() {
    let message = format_message(&complete_event(), None);

    assert_eq!(
        contents(&message),
        vec!["p1", PLACEHOLDER, PLACEHOLDER, "SUCCESS", "S", "F"]
    );
}

#[test]
fn test_partially_populated_trigger_renders_placeholder_for_missing_branch() {
    let trigger = TriggerMetadata {
        name: Some("Deploy".to_string()),
        branch_name: None,
    };

    let message = format_message(&complete_event(), Some(&trigger));

    assert_eq!(contents(&message)[1..3], ["Deploy", PLACEHOLDER]);
}

#[test]
fn test_absent_times_render_placeholders() {
    let event = BuildEvent {
        start_time: None,
        finish_time: None,
        ..complete_event()
    };

    let message = format_message(&event, None);

    assert_eq!(contents(&message)[4..], [PLACEHOLDER, PLACEHOLDER]);
}

#[test]
fn test_empty_event_still_has_six_widgets() {
    let message = format_message(&BuildEvent::default(), None);

    let widgets = widgets(&message);
    assert_eq!(widgets.len(), 6);
    assert!(widgets.iter().all(|(_, content)| content == PLACEHOLDER));
    assert_eq!(
        widgets.iter().map(|(label, _)| label.as_str()).collect::<Vec<_>>(),
        WIDGET_LABELS
    );
}

#[test]
fn test_header_is_fixed() {
    let message = format_message(&complete_event(), None);

    assert_eq!(message.cards[0].header.title, CARD_TITLE);
    assert_eq!(message.cards[0].header.image_url, CARD_IMAGE_URL);
}
