//! Property tests for the stored-settings merge.
//!
//! Settings records are stored as JSON and merged under the hard-coded
//! defaults on load, so a record written by an older build never breaks a
//! newer one. `ChatbotSettings` stands in for all three singletons; the
//! merge itself is type-agnostic.

use proptest::prelude::*;
use serde_json::{json, Value};

use crate::core::merge::merge_with_defaults;
use crate::core::storage::ChatbotSettings;

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,40}"
}

fn as_value<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).expect("settings serialize")
}

#[test]
fn test_empty_record_is_identity() {
    let defaults = ChatbotSettings::default();
    let merged = merge_with_defaults(json!({}), &defaults);
    assert_eq!(as_value(&merged), as_value(&defaults));
}

proptest! {
    /// A stored field always wins over its default; untouched fields keep
    /// their default values.
    #[test]
    fn prop_stored_field_wins(name in arb_text()) {
        let defaults = ChatbotSettings::default();
        let merged = merge_with_defaults(json!({ "assistant_name": name }), &defaults);
        prop_assert_eq!(merged.assistant_name, name);
        prop_assert_eq!(merged.system_instruction, defaults.system_instruction);
        prop_assert_eq!(merged.welcome_message_vi, defaults.welcome_message_vi);
    }

    /// A null field reads as absent and falls back to its default.
    #[test]
    fn prop_null_field_falls_back(
        field in prop_oneof![
            Just("assistant_name"),
            Just("system_instruction"),
            Just("welcome_message_vi"),
            Just("quick_actions"),
        ],
    ) {
        let defaults = ChatbotSettings::default();
        let mut stored = serde_json::Map::new();
        stored.insert(field.to_string(), Value::Null);
        let merged = merge_with_defaults(Value::Object(stored), &defaults);
        prop_assert_eq!(as_value(&merged), as_value(&defaults));
    }

    /// Merging any partial record yields a value with exactly the default
    /// field set; nothing is dropped and nothing extra is invented.
    #[test]
    fn prop_merge_never_drops_fields(name in arb_text(), welcome in arb_text()) {
        let defaults = ChatbotSettings::default();
        let merged = merge_with_defaults(
            json!({ "assistant_name": name, "welcome_message_vi": welcome }),
            &defaults,
        );
        let merged_keys: Vec<String> = as_value(&merged)
            .as_object()
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default();
        let default_keys: Vec<String> = as_value(&defaults)
            .as_object()
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default();
        prop_assert_eq!(merged_keys, default_keys);
    }
}
