//! Proptest generators for property-based testing.

use proptest::prelude::*;

use changelist_core::{ChangeAction, TufChange};

/// Generate a ChangeAction.
pub fn change_action() -> impl Strategy<Value = ChangeAction> {
    prop_oneof![
        Just(ChangeAction::Create),
        Just(ChangeAction::Update),
        Just(ChangeAction::Delete),
    ]
}

/// Generate a role-like scope.
pub fn scope() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("root".to_string()),
        Just("targets".to_string()),
        Just("snapshot".to_string()),
        Just("timestamp".to_string()),
        "targets/[a-z][a-z0-9-]{0,15}",
    ]
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate an arbitrary change record.
pub fn tuf_change() -> impl Strategy<Value = TufChange> {
    (
        change_action(),
        scope(),
        "[a-z]{0,12}",
        ".{0,48}",
        payload(512),
    )
        .prop_map(|(action, scope, change_type, path, data)| {
            TufChange::new(action, scope, change_type, path, data)
        })
}
