// Default value handling for schema properties.
//
// A property default is three-state: unset, an explicit value (which may be
// JSON null), or a deferred computation evaluated each time it is read.
// Collapsing "unset" and "null" into one state would make nullable defaults
// ambiguous, so the distinction is modeled as an explicit tagged union.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Marker type representing the absence of a value.
///
/// Distinguishes "no value supplied" from "value supplied as `null`", e.g.
/// in editing workflows where an untouched field must not overwrite stored
/// data with `null`. Instances never carry data; the type itself expresses
/// the intent. Deliberately not `Clone`, `Copy` or serializable.
#[derive(Debug, PartialEq, Eq)]
pub struct Undefined;

impl fmt::Display for Undefined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "undefined")
    }
}

/// The default value of a property.
#[derive(Clone, Default)]
pub enum DefaultValue {
    /// No default declared.
    #[default]
    Unset,
    /// An explicit default, including `Value::Null`.
    Value(Value),
    /// A zero-argument deferred computation, evaluated on every read.
    Computed(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    /// Returns true unless the default is `Unset`.
    pub fn is_set(&self) -> bool {
        !matches!(self, DefaultValue::Unset)
    }

    /// Resolves the default to a concrete value.
    ///
    /// Returns `None` when unset. A `Computed` default is re-evaluated on
    /// every call; memoization is the callback's own concern.
    pub fn resolve(&self) -> Option<Value> {
        match self {
            DefaultValue::Unset => None,
            DefaultValue::Value(value) => Some(value.clone()),
            DefaultValue::Computed(callback) => Some(callback()),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Unset => write!(f, "Unset"),
            DefaultValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            DefaultValue::Computed(_) => write!(f, "Computed(<closure>)"),
        }
    }
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        DefaultValue::Value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_undefined_marker_is_not_null() {
        // The marker renders as its own notion, never as null.
        assert_eq!(Undefined.to_string(), "undefined");
        assert_ne!(format!("{Undefined:?}"), format!("{:?}", Value::Null));
    }

    #[test]
    fn test_unset_default() {
        let default = DefaultValue::Unset;
        assert!(!default.is_set());
        assert_eq!(default.resolve(), None);
    }

    #[test]
    fn test_explicit_null_default_is_set() {
        let default = DefaultValue::Value(Value::Null);
        assert!(default.is_set());
        assert_eq!(default.resolve(), Some(Value::Null));
    }

    #[test]
    fn test_computed_default_evaluated_per_read() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let default = DefaultValue::Computed(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            json!(42)
        }));

        assert!(default.is_set());
        assert_eq!(default.resolve(), Some(json!(42)));
        assert_eq!(default.resolve(), Some(json!(42)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
