// Array property variant.

use serde_json::{json, Map, Value};

use crate::export::json_schema::JsonSchemaExporter;
use crate::export::rules::{Rule, RuleContext};
use crate::internal::error::Result;
use crate::property::{impl_meta_builders, Property, PropertyMeta};

/// An ordered list property with a single item shape.
#[derive(Debug, Clone, Default)]
pub struct ArrayProperty {
    pub(crate) meta: PropertyMeta,
    pub(crate) items: Option<Box<Property>>,
    pub(crate) min_items: Option<u64>,
    pub(crate) max_items: Option<u64>,
    pub(crate) unique_items: bool,
}

impl_meta_builders!(ArrayProperty);

impl ArrayProperty {
    pub fn new() -> Self {
        Self::default()
    }

    /// The property every item must conform to.
    pub fn items(mut self, items: impl Into<Property>) -> Self {
        self.items = Some(Box::new(items.into()));
        self
    }

    pub fn min_items(mut self, min_items: u64) -> Self {
        self.min_items = Some(min_items);
        self
    }

    pub fn max_items(mut self, max_items: u64) -> Self {
        self.max_items = Some(max_items);
        self
    }

    pub fn unique_items(mut self, unique_items: bool) -> Self {
        self.unique_items = unique_items;
        self
    }

    pub(crate) fn item_property(&self) -> Option<&Property> {
        self.items.as_deref()
    }

    pub(crate) fn json_fragment(&self, exporter: &JsonSchemaExporter) -> Result<Map<String, Value>> {
        let mut fragment = Map::new();
        fragment.insert("type".to_string(), json!("array"));

        if let Some(items) = &self.items {
            fragment.insert("items".to_string(), exporter.export(items)?);
        }
        if let Some(min_items) = self.min_items {
            fragment.insert("minItems".to_string(), json!(min_items));
        }
        if let Some(max_items) = self.max_items {
            fragment.insert("maxItems".to_string(), json!(max_items));
        }
        if self.unique_items {
            fragment.insert("uniqueItems".to_string(), json!(true));
        }

        Ok(fragment)
    }

    pub(crate) fn validation_rules(
        &self,
        value: &Value,
        ctx: &mut RuleContext,
    ) -> Result<Vec<Rule>> {
        let mut rules = vec![Rule::token("array"), Rule::token("list")];

        if let Some(min_items) = self.min_items {
            rules.push(Rule::token(format!("min:{min_items}")));
        }
        if let Some(max_items) = self.max_items {
            rules.push(Rule::token(format!("max:{max_items}")));
        }
        if self.unique_items {
            rules.push(Rule::token("distinct"));
        }

        // Items are addressed by concrete index instead of a wildcard path
        // so a failure names the offending element.
        if let (Some(items), Some(elements)) = (&self.items, value.as_array()) {
            for (index, element) in elements.iter().enumerate() {
                ctx.export_child(items, &index.to_string(), element)?;
            }
        }

        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::IntegerProperty;

    #[test]
    fn test_json_fragment_with_items() {
        let property = ArrayProperty::new()
            .items(IntegerProperty::new().minimum(0, false))
            .min_items(1)
            .max_items(5)
            .unique_items(true);

        let fragment = property.json_fragment(&JsonSchemaExporter::new()).unwrap();
        assert_eq!(
            Value::Object(fragment),
            json!({
                "type": "array",
                "items": {"type": "integer", "minimum": 0},
                "minItems": 1,
                "maxItems": 5,
                "uniqueItems": true,
            })
        );
    }

    #[test]
    fn test_json_fragment_without_items() {
        let fragment = ArrayProperty::new()
            .json_fragment(&JsonSchemaExporter::new())
            .unwrap();
        assert_eq!(Value::Object(fragment), json!({"type": "array"}));
    }

    #[test]
    fn test_own_rules() {
        let mut ctx = RuleContext::default();
        let rules = ArrayProperty::new()
            .min_items(1)
            .unique_items(true)
            .validation_rules(&Value::Null, &mut ctx)
            .unwrap();

        assert_eq!(
            rules,
            vec![
                Rule::token("array"),
                Rule::token("list"),
                Rule::token("min:1"),
                Rule::token("distinct"),
            ]
        );
        assert!(ctx.into_rules().is_empty());
    }
}
