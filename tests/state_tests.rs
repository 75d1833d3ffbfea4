use std::cell::Cell;
use std::rc::Rc;

use serde_json::json;

use hydraui::domain::{CommentItem, FieldValue};
use hydraui::schema::decode_field;
use hydraui::state::{EditKey, SettingsState, WizardProgress};

#[test]
fn setters_notify_subscribers_synchronously() {
    let mut state = SettingsState::new();
    let seen = Rc::new(Cell::new(0));
    let counter = Rc::clone(&seen);
    let _guard = state.on_change(move || counter.set(counter.get() + 1));

    state.set_expand(true);
    state.set_current_output_url("sites/primary");
    state.set_search_query("port");

    // One notification per setter, no batching.
    assert_eq!(seen.get(), 3);
    assert!(state.expand());
    assert_eq!(state.current_output_url(), "sites/primary");
}

#[test]
fn dropped_subscription_stops_receiving() {
    let mut state = SettingsState::new();
    let seen = Rc::new(Cell::new(0));
    let counter = Rc::clone(&seen);
    let guard = state.on_change(move || counter.set(counter.get() + 1));

    state.set_expand(true);
    drop(guard);
    state.set_expand(false);

    assert_eq!(seen.get(), 1);
}

#[test]
fn staged_edits_build_the_commit_payload() {
    let mut state = SettingsState::new();
    let field = decode_field(&json!({"value": "8443", "type": "int"}), 0, false)
        .expect("field decoded");

    state.stage_edit(EditKey::new("sites.yaml", "sites.primary.port"), field);
    assert!(state.has_pending_edits());

    let payload = state.save_payload();
    assert_eq!(payload.len(), 1);
    assert_eq!(payload[0].input_url, "sites.primary.port");
    assert_eq!(payload[0].file_id, "sites.yaml");
    assert_eq!(payload[0].value, json!(8443));
}

#[test]
fn restaging_a_key_overwrites_the_pending_edit() {
    let mut state = SettingsState::new();
    let key = EditKey::new("env.yaml", "environment");

    let first = decode_field(&json!({"value": "staging"}), 0, false).expect("decoded");
    let second = decode_field(&json!({"value": "production"}), 0, false).expect("decoded");
    state.stage_edit(key.clone(), first);
    state.stage_edit(key.clone(), second);

    assert_eq!(state.edits().len(), 1);
    assert_eq!(
        state.edits()[&key].value,
        Some(FieldValue::Text("production".to_string()))
    );
}

#[test]
fn discarding_an_edit_returns_it_for_restore() {
    let mut state = SettingsState::new();
    let key = EditKey::new("env.yaml", "environment");
    let field = decode_field(&json!({"value": "staging"}), 0, false).expect("decoded");
    state.stage_edit(key.clone(), field);

    let discarded = state.discard_edit(&key).expect("edit present");
    assert_eq!(discarded.value, Some(FieldValue::Text("staging".to_string())));
    assert!(!state.has_pending_edits());
    assert!(state.discard_edit(&key).is_none());
}

#[test]
fn comment_queue_accumulates_until_flushed() {
    let mut state = SettingsState::new();
    state.queue_comment(CommentItem {
        url: "sites.primary.port".to_string(),
        file_id: "sites.yaml".to_string(),
        is_comment: true,
    });
    state.queue_comment(CommentItem {
        url: "sites.primary.hostname".to_string(),
        file_id: "sites.yaml".to_string(),
        is_comment: false,
    });

    assert_eq!(state.comment_queue().len(), 2);
    assert!(state.comment_queue()[0].is_comment);
}

#[test]
fn wizard_progress_tracks_backend_snapshots() {
    use hydraui::domain::{Arch, Site, StepStatus, WizardState};

    let mut progress = WizardProgress::new();
    let seen = Rc::new(Cell::new(0));
    let counter = Rc::clone(&seen);
    let _guard = progress.on_change(move || counter.set(counter.get() + 1));

    progress.apply_snapshot(WizardState {
        archs: vec![Arch {
            name: "edge".to_string(),
            status: StepStatus::Completed,
        }],
        sites: vec![Site {
            name: "primary".to_string(),
            status: StepStatus::InProgress,
            step_number: 2,
        }],
    });

    assert_eq!(seen.get(), 2);
    let site = progress.site("primary").expect("site tracked");
    assert_eq!(site.status, StepStatus::InProgress);
    assert_eq!(site.step_number, 2);
}
