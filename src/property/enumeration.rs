// Enum property variant, its case type and case resolvers.

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::{Map, Value};

use crate::export::rules::Rule;
use crate::internal::error::{Error, Result};
use crate::property::{impl_meta_builders, PropertyMeta};

/// One legal value of an enumeration: a value, an optional human label and
/// optional free-form metadata. Duplicate values are not deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumCase {
    value: Value,
    label: Option<String>,
    meta: Option<Map<String, Value>>,
}

impl EnumCase {
    /// Creates a case. Values are expected to be strings or integers.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            label: None,
            meta: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn meta(&self) -> Option<&Map<String, Value>> {
        self.meta.as_ref()
    }

    /// String form of the value as used in rule tokens and `$meta` keys.
    pub(crate) fn value_token(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Strategy producing the legal case set for an enum property.
#[derive(Clone)]
pub enum EnumResolver {
    /// Cases fixed at construction.
    Static(Vec<EnumCase>),
    /// Cases computed lazily; the callback fires at most once per resolver
    /// instance and the result is cached for the resolver's lifetime.
    Dynamic(DynamicCases),
}

#[derive(Clone)]
pub struct DynamicCases {
    callback: Arc<dyn Fn() -> Vec<EnumCase> + Send + Sync>,
    cases: OnceLock<Vec<EnumCase>>,
}

impl EnumResolver {
    pub fn fixed(cases: Vec<EnumCase>) -> Self {
        EnumResolver::Static(cases)
    }

    pub fn dynamic(callback: impl Fn() -> Vec<EnumCase> + Send + Sync + 'static) -> Self {
        EnumResolver::Dynamic(DynamicCases {
            callback: Arc::new(callback),
            cases: OnceLock::new(),
        })
    }

    /// The resolved case list. Dynamic resolution is memoized, including
    /// against concurrent first access.
    pub fn cases(&self) -> &[EnumCase] {
        match self {
            EnumResolver::Static(cases) => cases,
            EnumResolver::Dynamic(dynamic) => {
                dynamic.cases.get_or_init(|| (dynamic.callback)())
            }
        }
    }
}

impl fmt::Debug for EnumResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumResolver::Static(cases) => f.debug_tuple("Static").field(cases).finish(),
            EnumResolver::Dynamic(dynamic) => f
                .debug_struct("Dynamic")
                .field("resolved", &dynamic.cases.get().is_some())
                .finish(),
        }
    }
}

/// An enumeration property.
#[derive(Debug, Clone, Default)]
pub struct EnumProperty {
    pub(crate) meta: PropertyMeta,
    pub(crate) resolver: Option<Arc<EnumResolver>>,
}

impl_meta_builders!(EnumProperty);

impl EnumProperty {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the case list. Replaces any previously configured source.
    pub fn cases(mut self, cases: Vec<EnumCase>) -> Self {
        self.resolver = Some(Arc::new(EnumResolver::fixed(cases)));
        self
    }

    /// Computes the case list lazily. Replaces any previously configured source.
    pub fn dynamic(mut self, callback: impl Fn() -> Vec<EnumCase> + Send + Sync + 'static) -> Self {
        self.resolver = Some(Arc::new(EnumResolver::dynamic(callback)));
        self
    }

    /// Installs a resolver, possibly shared between properties so that a
    /// dynamic source is computed once for all of them.
    pub fn resolver(mut self, resolver: Arc<EnumResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub(crate) fn resolved_cases(&self) -> Result<&[EnumCase]> {
        self.resolver
            .as_deref()
            .map(EnumResolver::cases)
            .ok_or(Error::UnresolvedEnumSource)
    }

    pub(crate) fn json_fragment(&self) -> Result<Map<String, Value>> {
        let cases = self.resolved_cases()?;
        let mut fragment = Map::new();
        fragment.insert(
            "enum".to_string(),
            Value::Array(cases.iter().map(|case| case.value().clone()).collect()),
        );

        // Non-standard carrier for per-case metadata, keyed by value.
        let metas: Map<String, Value> = cases
            .iter()
            .filter_map(|case| {
                case.meta()
                    .filter(|meta| !meta.is_empty())
                    .map(|meta| (case.value_token(), Value::Object(meta.clone())))
            })
            .collect();
        if !metas.is_empty() {
            fragment.insert("$meta".to_string(), Value::Object(metas));
        }

        Ok(fragment)
    }

    pub(crate) fn validation_rules(&self) -> Result<Vec<Rule>> {
        let values: Vec<String> = self
            .resolved_cases()?
            .iter()
            .map(EnumCase::value_token)
            .collect();
        Ok(vec![Rule::token(format!("in:{}", values.join(",")))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn color_cases() -> Vec<EnumCase> {
        vec![
            EnumCase::new("red").with_label("Red"),
            EnumCase::new("green"),
        ]
    }

    #[test]
    fn test_static_resolver() {
        let resolver = EnumResolver::fixed(color_cases());
        assert_eq!(resolver.cases().len(), 2);
        assert_eq!(resolver.cases()[0].label(), Some("Red"));
    }

    #[test]
    fn test_dynamic_resolver_memoizes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let resolver = EnumResolver::dynamic(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            color_cases()
        });

        assert_eq!(resolver.cases().len(), 2);
        assert_eq!(resolver.cases().len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shared_resolver_fires_once_across_clones() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let property = EnumProperty::new().dynamic(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            color_cases()
        });
        let clone = property.clone();

        assert!(property.resolved_cases().is_ok());
        assert!(clone.resolved_cases().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unconfigured_resolver_fails() {
        let property = EnumProperty::new();
        assert_eq!(
            property.resolved_cases().unwrap_err(),
            Error::UnresolvedEnumSource
        );
        assert_eq!(
            property.validation_rules().unwrap_err(),
            Error::UnresolvedEnumSource
        );
    }

    #[test]
    fn test_json_fragment_with_meta() {
        let mut meta = Map::new();
        meta.insert("hex".to_string(), json!("#ff0000"));
        let property = EnumProperty::new().cases(vec![
            EnumCase::new("red").with_meta(meta),
            EnumCase::new(2),
        ]);

        let fragment = property.json_fragment().unwrap();
        assert_eq!(
            Value::Object(fragment),
            json!({
                "enum": ["red", 2],
                "$meta": {"red": {"hex": "#ff0000"}},
            })
        );
    }

    #[test]
    fn test_empty_meta_is_skipped() {
        let property = EnumProperty::new()
            .cases(vec![EnumCase::new("red").with_meta(Map::new())]);
        let fragment = property.json_fragment().unwrap();
        assert!(!fragment.contains_key("$meta"));
    }

    #[test]
    fn test_in_rule_over_mixed_values() {
        let property = EnumProperty::new().cases(vec![
            EnumCase::new("red"),
            EnumCase::new(2),
        ]);
        assert_eq!(
            property.validation_rules().unwrap(),
            vec![Rule::token("in:red,2")]
        );
    }
}
