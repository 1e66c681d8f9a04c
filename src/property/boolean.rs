// Boolean property variant.

use serde_json::{json, Map, Value};

use crate::export::rules::Rule;
use crate::property::{impl_meta_builders, PropertyMeta};

/// A boolean property.
///
/// With `accepted` set the only legal value is `true` (consent checkboxes,
/// terms-of-service flags), which exports as `const: true`.
#[derive(Debug, Clone, Default)]
pub struct BooleanProperty {
    pub(crate) meta: PropertyMeta,
    pub(crate) accepted: bool,
}

impl_meta_builders!(BooleanProperty);

impl BooleanProperty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accepted(mut self, accepted: bool) -> Self {
        self.accepted = accepted;
        self
    }

    pub(crate) fn json_fragment(&self) -> Map<String, Value> {
        let mut fragment = Map::new();
        if self.accepted {
            fragment.insert("const".to_string(), json!(true));
        } else {
            fragment.insert("type".to_string(), json!("boolean"));
        }
        fragment
    }

    pub(crate) fn validation_rules(&self) -> Vec<Rule> {
        let mut rules = vec![Rule::token("boolean")];
        if self.accepted {
            rules.push(Rule::token("accepted"));
        }
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_fragment() {
        let fragment = BooleanProperty::new().json_fragment();
        assert_eq!(Value::Object(fragment), json!({"type": "boolean"}));
    }

    #[test]
    fn test_accepted_exports_const_true() {
        let fragment = BooleanProperty::new().accepted(true).json_fragment();
        assert_eq!(Value::Object(fragment), json!({"const": true}));
    }

    #[test]
    fn test_validation_rules() {
        assert_eq!(
            BooleanProperty::new().validation_rules(),
            vec![Rule::token("boolean")]
        );
        assert_eq!(
            BooleanProperty::new().accepted(true).validation_rules(),
            vec![Rule::token("boolean"), Rule::token("accepted")]
        );
    }
}
