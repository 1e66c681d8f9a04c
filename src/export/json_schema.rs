// JSON Schema exporter.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::export::SchemaExporter;
use crate::internal::error::{Error, Result};
use crate::property::{AdditionalProperties, ObjectProperty, Property};
use crate::schema::Schema;

/// Exports a schema into a JSON Schema document.
///
/// The schema itself is rendered as an implicit object property with
/// `additionalProperties: false`; every nested property is exported the
/// same way, recursively.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaExporter;

impl JsonSchemaExporter {
    pub fn new() -> Self {
        Self
    }

    /// Exports one property: variant fragment, then gap-filling decoration
    /// (title, description, default), then the nullability transformation.
    pub fn export(&self, property: &Property) -> Result<Value> {
        let mut fragment = match property {
            Property::String(p) => p.json_fragment(),
            Property::Integer(p) => p.json_fragment(),
            Property::Boolean(p) => p.json_fragment(),
            Property::Enum(p) => p.json_fragment()?,
            Property::Array(p) => p.json_fragment(self)?,
            Property::Object(p) => p.json_fragment(self)?,
            Property::Custom(p) => {
                p.json_fragment()
                    .ok_or_else(|| Error::MissingExportCapability {
                        type_name: p.type_name().to_string(),
                        capability: "JSON Schema",
                    })?
            }
        };

        // Fill gaps only: a variant may pre-populate these for a different
        // key ordering, and its value wins.
        if let Some(title) = property.title() {
            if !fragment.contains_key("title") {
                fragment.insert("title".to_string(), json!(title));
            }
        }
        if let Some(description) = property.description() {
            if !fragment.contains_key("description") {
                fragment.insert("description".to_string(), json!(description));
            }
        }
        if property.has_default() && !fragment.contains_key("default") {
            fragment.insert("default".to_string(), property.get_default()?);
        }

        if property.is_nullable() {
            apply_nullability(&mut fragment);
        }

        Ok(Value::Object(fragment))
    }
}

/// Rewrites a fragment so `null` becomes an accepted value.
///
/// Priority order is load-bearing: `enum` and `const` constrain the value
/// set more tightly than a bare `type` tag, so they take precedence over
/// introducing a generic null-typed fallback.
fn apply_nullability(fragment: &mut Map<String, Value>) {
    // 1. Non-empty enum: append null (idempotent).
    if let Some(Value::Array(cases)) = fragment.get_mut("enum") {
        if !cases.is_empty() {
            if !cases.iter().any(Value::is_null) {
                cases.push(Value::Null);
            }
            return;
        }
    }

    // 2. Const: widen into a two-value enum.
    if let Some(constant) = fragment.remove("const") {
        fragment.insert("enum".to_string(), json!([constant, null]));
        return;
    }

    // 3. Type tag: single name becomes a pair, list gets "null" appended.
    match fragment.get_mut("type") {
        Some(Value::String(single)) => {
            let single = single.clone();
            fragment.insert("type".to_string(), json!([single, "null"]));
        }
        Some(Value::Array(names)) => {
            if !names.iter().any(|name| name == "null") {
                names.push(json!("null"));
            }
        }
        // 4. Nothing constrains the value: just allow null.
        _ => {
            fragment.insert("type".to_string(), json!(["null"]));
        }
    }
}

impl SchemaExporter for JsonSchemaExporter {
    type Output = Value;

    fn export_schema(&self, schema: &Schema) -> Result<Value> {
        debug!(schema = %schema.identifier(), "exporting JSON Schema");

        let mut root = ObjectProperty::new()
            .additional_properties(AdditionalProperties::Deny)
            .properties(schema.properties().iter().cloned())?;
        if let Some(title) = schema.title() {
            root = root.title(title);
        }
        if let Some(description) = schema.description() {
            root = root.description(description);
        }

        self.export(&root.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{BooleanProperty, EnumCase, EnumProperty, StringProperty};

    fn export(property: impl Into<Property>) -> Value {
        JsonSchemaExporter::new().export(&property.into()).unwrap()
    }

    #[test]
    fn test_nullable_type_becomes_pair() {
        let exported = export(StringProperty::new().nullable(true));
        assert_eq!(exported, json!({"type": ["string", "null"]}));
    }

    #[test]
    fn test_nullable_enum_appends_null() {
        let exported = export(
            EnumProperty::new()
                .cases(vec![EnumCase::new("a"), EnumCase::new("b")])
                .nullable(true),
        );
        assert_eq!(exported, json!({"enum": ["a", "b", null]}));
    }

    #[test]
    fn test_nullable_enum_is_idempotent() {
        // A resolver that already lists null gains no second one.
        let exported = export(
            EnumProperty::new()
                .cases(vec![EnumCase::new("a"), EnumCase::new(Value::Null)])
                .nullable(true),
        );
        assert_eq!(exported, json!({"enum": ["a", null]}));
    }

    #[test]
    fn test_nullable_const_widens_to_enum() {
        let exported = export(BooleanProperty::new().accepted(true).nullable(true));
        assert_eq!(exported, json!({"enum": [true, null]}));
    }

    #[test]
    fn test_nullable_without_shape_allows_bare_null() {
        let mut fragment = Map::new();
        apply_nullability(&mut fragment);
        assert_eq!(Value::Object(fragment), json!({"type": ["null"]}));
    }

    #[test]
    fn test_decoration_fills_gaps() {
        let exported = export(
            StringProperty::new()
                .title("Name")
                .description("Display name")
                .default_value("anon"),
        );
        assert_eq!(
            exported,
            json!({
                "type": "string",
                "title": "Name",
                "description": "Display name",
                "default": "anon",
            })
        );
    }

    #[test]
    fn test_null_default_is_emitted() {
        let exported = export(StringProperty::new().nullable(true).default_null());
        assert_eq!(
            exported,
            json!({"type": ["string", "null"], "default": null})
        );
    }

    #[test]
    fn test_schema_export_wraps_implicit_object() {
        let mut schema = Schema::new("person").with_title("Person");
        schema
            .append(vec![("name", StringProperty::new().required(true))])
            .unwrap();

        let exported = JsonSchemaExporter::new().export_schema(&schema).unwrap();
        assert_eq!(
            exported,
            json!({
                "type": "object",
                "properties": {"name": {"type": "string"}},
                "required": ["name"],
                "additionalProperties": false,
                "title": "Person",
            })
        );
    }
}
