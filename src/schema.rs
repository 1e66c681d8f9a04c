// Schema container.
//
// A schema is a named, ordered mapping of property names to properties,
// the root unit handed to an exporter. It owns its properties; properties
// are value-like and carry no back-reference, so they may be copied freely
// between schemas.

use serde_json::{Map, Value};
use tracing::debug;

use crate::export::json_schema::JsonSchemaExporter;
use crate::export::rules::{RuleSet, ValidationRulesExporter};
use crate::export::ui::{UiComponent, UiExporter, UiOperation};
use crate::export::SchemaExporter;
use crate::internal::error::{Error, Result};
use crate::property::Property;

#[derive(Debug, Clone, Default)]
pub struct Schema {
    identifier: String,
    title: Option<String>,
    description: Option<String>,
    properties: Vec<(String, Property)>,
}

impl Schema {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// All properties in declaration order.
    pub fn properties(&self) -> &[(String, Property)] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, property)| property)
    }

    /// Appends a batch of properties atomically.
    ///
    /// The whole batch is checked before any mutation: name collisions
    /// (against existing properties and within the batch) fail with
    /// `DuplicateProperty`, and a property that is both required and
    /// carries a default fails with `InvalidComposition`. On failure the
    /// schema is unchanged.
    pub fn append<N, P, I>(&mut self, properties: I) -> Result<&mut Self>
    where
        N: Into<String>,
        P: Into<Property>,
        I: IntoIterator<Item = (N, P)>,
    {
        let batch: Vec<(String, Property)> = properties
            .into_iter()
            .map(|(name, property)| (name.into(), property.into()))
            .collect();

        for (index, (name, property)) in batch.iter().enumerate() {
            let collides_existing = self.property(name).is_some();
            let collides_batch = batch[..index].iter().any(|(earlier, _)| earlier == name);
            if collides_existing || collides_batch {
                return Err(Error::DuplicateProperty {
                    scope: self.identifier.clone(),
                    name: name.clone(),
                });
            }

            // A default implies the key may be omitted, which contradicts
            // requiring its presence.
            if property.is_required() && property.has_default() {
                return Err(Error::InvalidComposition { name: name.clone() });
            }
        }

        self.properties.extend(batch);
        Ok(self)
    }

    /// A new schema keeping only the named properties.
    pub fn only(&self, names: &[&str]) -> Schema {
        self.filtered(|name| names.contains(&name))
    }

    /// A new schema without the named properties.
    pub fn except(&self, names: &[&str]) -> Schema {
        self.filtered(|name| !names.contains(&name))
    }

    fn filtered(&self, keep: impl Fn(&str) -> bool) -> Schema {
        Schema {
            identifier: self.identifier.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            properties: self
                .properties
                .iter()
                .filter(|(name, _)| keep(name))
                .cloned()
                .collect(),
        }
    }

    /// Resolves defaults into the input mapping.
    ///
    /// Every declared property with a default replaces a key that is
    /// absent or explicitly `null`; all other keys, declared or not, pass
    /// through unchanged. Filtering undeclared keys is the rule exporter's
    /// concern, not this step's.
    pub fn with_defaults(&self, input: &Map<String, Value>) -> Map<String, Value> {
        let mut output = input.clone();
        for (name, property) in &self.properties {
            let missing = matches!(input.get(name), None | Some(Value::Null));
            if !missing {
                continue;
            }
            if let Some(default) = property.meta().default.resolve() {
                debug!(property = %name, "applying default value");
                output.insert(name.clone(), default);
            }
        }
        output
    }

    /// Renders the schema through one exporter.
    pub fn export<E: SchemaExporter>(&self, exporter: &E) -> Result<E::Output> {
        exporter.export_schema(self)
    }

    /// Exports as a JSON Schema document.
    pub fn to_json_schema(&self) -> Result<Value> {
        self.export(&JsonSchemaExporter::new())
    }

    /// Exports as a path-addressed validation rule set over `data`.
    pub fn to_validation_rules(&self, data: Value) -> Result<RuleSet> {
        self.export(&ValidationRulesExporter::new(data))
    }

    /// Exports as UI component descriptors for the given operation.
    pub fn to_ui_components(&self, operation: UiOperation) -> Result<Vec<UiComponent>> {
        self.export(&UiExporter::new(operation))
    }
}
