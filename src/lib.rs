// polyschema library entry point
//
// A declarative data-shape description library: compose a `Schema` from
// typed `Property` nodes and render the one definition into several target
// artifacts (JSON Schema, path-addressed validation rules, UI component
// descriptors) without re-specifying the shape per target.

pub mod export;
pub mod internal;
pub mod property;
pub mod schema;

pub use export::json_schema::JsonSchemaExporter;
pub use export::rules::{Rule, RuleSet, ValidationRulesExporter};
pub use export::ui::{
    DisplayFormat, SelectOption, UiComponent, UiExporter, UiOperation, UiWidget,
};
pub use export::SchemaExporter;
pub use internal::error::{Error, Result};
pub use property::{
    AdditionalProperties, ArrayProperty, BooleanProperty, CustomProperty, DefaultValue, EnumCase,
    EnumProperty, EnumResolver, IntegerProperty, ObjectProperty, Property, PropertyMeta,
    StringFormat, StringProperty, Undefined,
};
pub use schema::Schema;
