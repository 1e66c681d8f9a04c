// Integer property variant.

use serde_json::{json, Map, Value};

use crate::export::rules::Rule;
use crate::property::{impl_meta_builders, PropertyMeta};

/// A signed integer property with optional bounds.
#[derive(Debug, Clone, Default)]
pub struct IntegerProperty {
    pub(crate) meta: PropertyMeta,
    pub(crate) minimum: Option<i64>,
    pub(crate) maximum: Option<i64>,
    pub(crate) exclusive_minimum: bool,
    pub(crate) exclusive_maximum: bool,
    pub(crate) multiple_of: Option<i64>,
}

impl_meta_builders!(IntegerProperty);

impl IntegerProperty {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower bound; strict (`>`) when `exclusive` is set.
    pub fn minimum(mut self, minimum: i64, exclusive: bool) -> Self {
        self.minimum = Some(minimum);
        self.exclusive_minimum = exclusive;
        self
    }

    /// Upper bound; strict (`<`) when `exclusive` is set.
    pub fn maximum(mut self, maximum: i64, exclusive: bool) -> Self {
        self.maximum = Some(maximum);
        self.exclusive_maximum = exclusive;
        self
    }

    /// Value must be a multiple of `multiple`. Non-positive values are ignored.
    pub fn multiple_of(mut self, multiple: i64) -> Self {
        self.multiple_of = Some(multiple);
        self
    }

    pub(crate) fn json_fragment(&self) -> Map<String, Value> {
        let mut fragment = Map::new();
        fragment.insert("type".to_string(), json!("integer"));

        if let Some(minimum) = self.minimum {
            let key = if self.exclusive_minimum {
                "exclusiveMinimum"
            } else {
                "minimum"
            };
            fragment.insert(key.to_string(), json!(minimum));
        }
        if let Some(maximum) = self.maximum {
            let key = if self.exclusive_maximum {
                "exclusiveMaximum"
            } else {
                "maximum"
            };
            fragment.insert(key.to_string(), json!(maximum));
        }
        if let Some(multiple) = self.multiple_of {
            if multiple > 0 {
                fragment.insert("multipleOf".to_string(), json!(multiple));
            }
        }

        fragment
    }

    pub(crate) fn validation_rules(&self) -> Vec<Rule> {
        let mut rules = vec![Rule::token("integer")];

        if let Some(minimum) = self.minimum {
            if self.exclusive_minimum {
                // Strict inequality has no plain rule token; use a predicate.
                rules.push(Rule::check(format!("gt:{minimum}"), move |value| {
                    match value.as_i64() {
                        Some(n) if n > minimum => None,
                        _ => Some(format!("value must be greater than {minimum}")),
                    }
                }));
            } else {
                rules.push(Rule::token(format!("min:{minimum}")));
            }
        }
        if let Some(maximum) = self.maximum {
            if self.exclusive_maximum {
                rules.push(Rule::check(format!("lt:{maximum}"), move |value| {
                    match value.as_i64() {
                        Some(n) if n < maximum => None,
                        _ => Some(format!("value must be less than {maximum}")),
                    }
                }));
            } else {
                rules.push(Rule::token(format!("max:{maximum}")));
            }
        }
        if let Some(multiple) = self.multiple_of {
            if multiple > 0 {
                rules.push(Rule::token(format!("multiple_of:{multiple}")));
            }
        }

        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_fragment_inclusive_bounds() {
        let fragment = IntegerProperty::new()
            .minimum(0, false)
            .maximum(10, false)
            .multiple_of(2)
            .json_fragment();

        assert_eq!(
            Value::Object(fragment),
            json!({"type": "integer", "minimum": 0, "maximum": 10, "multipleOf": 2})
        );
    }

    #[test]
    fn test_json_fragment_exclusive_bounds() {
        let fragment = IntegerProperty::new()
            .minimum(0, true)
            .maximum(10, true)
            .json_fragment();

        assert_eq!(
            Value::Object(fragment),
            json!({"type": "integer", "exclusiveMinimum": 0, "exclusiveMaximum": 10})
        );
    }

    #[test]
    fn test_non_positive_multiple_of_is_ignored() {
        let fragment = IntegerProperty::new().multiple_of(0).json_fragment();
        assert_eq!(Value::Object(fragment), json!({"type": "integer"}));
    }

    #[test]
    fn test_validation_rules_inclusive() {
        let rules = IntegerProperty::new()
            .minimum(1, false)
            .maximum(5, false)
            .multiple_of(1)
            .validation_rules();

        assert_eq!(
            rules,
            vec![
                Rule::token("integer"),
                Rule::token("min:1"),
                Rule::token("max:5"),
                Rule::token("multiple_of:1"),
            ]
        );
    }

    #[test]
    fn test_exclusive_bound_predicates() {
        let rules = IntegerProperty::new()
            .minimum(0, true)
            .maximum(10, true)
            .validation_rules();

        assert_eq!(rules.len(), 3);
        let gt = &rules[1];
        let lt = &rules[2];
        assert_eq!(gt.name(), "gt:0");
        assert_eq!(lt.name(), "lt:10");

        assert!(gt.evaluate(&json!(1)).is_none());
        assert!(gt.evaluate(&json!(0)).is_some());
        assert!(lt.evaluate(&json!(9)).is_none());
        assert!(lt.evaluate(&json!(10)).is_some());
        assert!(gt.evaluate(&json!("nan")).is_some());
    }
}
