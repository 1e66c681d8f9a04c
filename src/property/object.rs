// Object property variant.

use serde_json::{json, Map, Value};

use crate::export::json_schema::JsonSchemaExporter;
use crate::export::rules::{Rule, RuleContext};
use crate::internal::error::{Error, Result};
use crate::property::{impl_meta_builders, Property, PropertyMeta};

/// Policy for input keys not declared in an object's property map.
#[derive(Debug, Clone, Default)]
pub enum AdditionalProperties {
    /// Undeclared keys are rejected.
    #[default]
    Deny,
    /// Undeclared keys pass through unvalidated.
    Allow,
    /// Undeclared keys are validated against the given property.
    Schema(Box<Property>),
}

/// A nested mapping property with an ordered set of named children.
#[derive(Debug, Clone, Default)]
pub struct ObjectProperty {
    pub(crate) meta: PropertyMeta,
    pub(crate) properties: Vec<(String, Property)>,
    pub(crate) additional_properties: AdditionalProperties,
}

impl_meta_builders!(ObjectProperty);

impl ObjectProperty {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds named child properties, preserving order.
    ///
    /// Fails with `DuplicateProperty` when a name repeats, either against
    /// already-registered children or within the batch.
    pub fn properties<N, P, I>(mut self, properties: I) -> Result<Self>
    where
        N: Into<String>,
        P: Into<Property>,
        I: IntoIterator<Item = (N, P)>,
    {
        for (name, property) in properties {
            let name = name.into();
            if self.properties.iter().any(|(existing, _)| *existing == name) {
                return Err(Error::DuplicateProperty {
                    scope: self
                        .meta
                        .title
                        .clone()
                        .unwrap_or_else(|| "object".to_string()),
                    name,
                });
            }
            self.properties.push((name, property.into()));
        }
        Ok(self)
    }

    pub fn additional_properties(mut self, policy: AdditionalProperties) -> Self {
        self.additional_properties = policy;
        self
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, property)| property)
    }

    fn declares(&self, name: &str) -> bool {
        self.properties.iter().any(|(existing, _)| existing == name)
    }

    pub(crate) fn json_fragment(&self, exporter: &JsonSchemaExporter) -> Result<Map<String, Value>> {
        let mut fragment = Map::new();
        fragment.insert("type".to_string(), json!("object"));

        let mut children = Map::new();
        let mut required = Vec::new();
        for (name, property) in &self.properties {
            children.insert(name.clone(), exporter.export(property)?);
            if property.is_required() {
                required.push(json!(name));
            }
        }
        fragment.insert("properties".to_string(), Value::Object(children));

        if !required.is_empty() {
            fragment.insert("required".to_string(), Value::Array(required));
        }

        let additional = match &self.additional_properties {
            AdditionalProperties::Deny => json!(false),
            AdditionalProperties::Allow => json!(true),
            AdditionalProperties::Schema(property) => exporter.export(property)?,
        };
        fragment.insert("additionalProperties".to_string(), additional);

        Ok(fragment)
    }

    pub(crate) fn validation_rules(
        &self,
        value: &Value,
        ctx: &mut RuleContext,
    ) -> Result<Vec<Rule>> {
        let rules = vec![Rule::token("array")];

        for (name, property) in &self.properties {
            let child_value = value
                .as_object()
                .and_then(|map| map.get(name))
                .cloned()
                .unwrap_or(Value::Null);
            ctx.export_child(property, name, &child_value)?;
        }

        if let Some(map) = value.as_object() {
            for (key, child_value) in map {
                if self.declares(key) {
                    continue;
                }
                match &self.additional_properties {
                    // Typed: validate exactly like a declared child.
                    AdditionalProperties::Schema(property) => {
                        ctx.export_child(property, key, child_value)?;
                    }
                    // Force the validator to retain the key.
                    AdditionalProperties::Allow => {
                        ctx.set_child_rules(key, vec![Rule::token("present")]);
                    }
                    AdditionalProperties::Deny => {
                        ctx.set_child_rules(key, vec![Rule::token("prohibited")]);
                    }
                }
            }
        }

        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::StringProperty;

    #[test]
    fn test_duplicate_child_name_fails() {
        let result = ObjectProperty::new().title("profile").properties(vec![
            ("name", StringProperty::new()),
            ("name", StringProperty::new()),
        ]);

        assert_eq!(
            result.unwrap_err(),
            Error::DuplicateProperty {
                scope: "profile".to_string(),
                name: "name".to_string(),
            }
        );
    }

    #[test]
    fn test_child_lookup_and_order() {
        let object = ObjectProperty::new()
            .properties(vec![
                ("b", StringProperty::new()),
                ("a", StringProperty::new()),
            ])
            .unwrap();

        assert!(object.property("a").is_some());
        assert!(object.property("missing").is_none());
        let names: Vec<&str> = object
            .properties
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_json_fragment_required_and_additional() {
        let object = ObjectProperty::new()
            .properties(vec![
                ("name", StringProperty::new().required(true)),
                ("nick", StringProperty::new()),
            ])
            .unwrap();

        let fragment = object.json_fragment(&JsonSchemaExporter::new()).unwrap();
        assert_eq!(
            Value::Object(fragment),
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "nick": {"type": "string"},
                },
                "required": ["name"],
                "additionalProperties": false,
            })
        );
    }

    #[test]
    fn test_json_fragment_omits_empty_required() {
        let object = ObjectProperty::new()
            .properties(vec![("nick", StringProperty::new())])
            .unwrap()
            .additional_properties(AdditionalProperties::Allow);

        let fragment = object.json_fragment(&JsonSchemaExporter::new()).unwrap();
        assert!(!fragment.contains_key("required"));
        assert_eq!(fragment.get("additionalProperties"), Some(&json!(true)));
    }
}
