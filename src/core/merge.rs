//! Merge partial stored documents over hard-coded defaults.
//!
//! Every settings singleton follows the same law: a stored document may be
//! missing any subset of fields (older writes, manual edits), and `load`
//! must return a complete value with the gaps filled from defaults. This is
//! that law, factored once.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Overlay the top-level fields of `stored` onto `defaults` and produce a
/// complete `T`.
///
/// The merge is shallow: a stored field replaces the default field wholesale,
/// including list and object fields. `Null` stored fields count as absent.
/// Anything that cannot be reconciled (non-object stored value, type-mangled
/// fields) falls back to the defaults rather than failing the load.
pub fn merge_with_defaults<T>(stored: Value, defaults: &T) -> T
where
    T: Serialize + DeserializeOwned + Clone,
{
    let mut base = match serde_json::to_value(defaults) {
        Ok(Value::Object(map)) => map,
        _ => return defaults.clone(),
    };

    let Value::Object(overlay) = stored else {
        return defaults.clone();
    };

    for (key, value) in overlay {
        if value.is_null() {
            continue;
        }
        base.insert(key, value);
    }

    match serde_json::from_value(Value::Object(base)) {
        Ok(merged) => merged,
        Err(e) => {
            log::warn!("Stored document does not fit its schema ({e}); using defaults");
            defaults.clone()
        }
    }
}
