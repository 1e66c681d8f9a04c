// Property model for the polyschema library.
//
// A `Property` is one typed node in a schema tree. Presentation metadata,
// requiredness, nullability and the default value are shared by all
// variants through `PropertyMeta`; each variant adds its own constraints.
//
// Requiredness and nullability are independent axes: `required` says the
// key must be present in input, `nullable` says `null` is a legal value
// once present. Neither implies the other.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::export::rules::{Rule, RuleContext};
use crate::export::ui::{UiComponent, UiOperation};
use crate::internal::error::{Error, Result};

pub mod array;
pub mod boolean;
pub mod default;
pub mod enumeration;
pub mod integer;
pub mod object;
pub mod string;

pub use self::array::ArrayProperty;
pub use self::boolean::BooleanProperty;
pub use self::default::{DefaultValue, Undefined};
pub use self::enumeration::{EnumCase, EnumProperty, EnumResolver};
pub use self::integer::IntegerProperty;
pub use self::object::{AdditionalProperties, ObjectProperty};
pub use self::string::{StringFormat, StringProperty};

/// Metadata shared by every property variant.
#[derive(Debug, Clone, Default)]
pub struct PropertyMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub required: bool,
    pub nullable: bool,
    pub default: DefaultValue,
}

/// Implements the fluent setters for the shared `meta` field of a variant.
macro_rules! impl_meta_builders {
    ($variant:ty) => {
        impl $variant {
            pub fn title(mut self, title: impl Into<String>) -> Self {
                self.meta.title = Some(title.into());
                self
            }

            pub fn description(mut self, description: impl Into<String>) -> Self {
                self.meta.description = Some(description.into());
                self
            }

            /// Marks the key as mandatory in input data.
            pub fn required(mut self, required: bool) -> Self {
                self.meta.required = required;
                self
            }

            /// Allows `null` as a value once the key is present.
            pub fn nullable(mut self, nullable: bool) -> Self {
                self.meta.nullable = nullable;
                self
            }

            pub fn default_value(mut self, value: impl Into<serde_json::Value>) -> Self {
                self.meta.default = crate::property::DefaultValue::Value(value.into());
                self
            }

            /// Declares an explicit `null` default, distinct from no default.
            pub fn default_null(mut self) -> Self {
                self.meta.default = crate::property::DefaultValue::Value(serde_json::Value::Null);
                self
            }

            /// Declares a deferred default, re-evaluated on every read.
            pub fn default_with(
                mut self,
                callback: impl Fn() -> serde_json::Value + Send + Sync + 'static,
            ) -> Self {
                self.meta.default =
                    crate::property::DefaultValue::Computed(std::sync::Arc::new(callback));
                self
            }
        }
    };
}
pub(crate) use impl_meta_builders;

/// Extension point for out-of-tree property variants.
///
/// Each export capability is an optional hook; an exporter handed a custom
/// variant whose hook returns `None` fails with `MissingExportCapability`.
pub trait CustomProperty: fmt::Debug + Send + Sync {
    /// Stable name used in error messages, e.g. `"geo-point"`.
    fn type_name(&self) -> &str;

    fn meta(&self) -> &PropertyMeta;

    /// The variant's own JSON Schema fragment (shape constraints only).
    fn json_fragment(&self) -> Option<Map<String, Value>> {
        None
    }

    /// The variant's own validation rule tokens for the given value.
    fn validation_rules(&self, _value: &Value) -> Option<Vec<Rule>> {
        None
    }

    /// The variant's UI widget descriptor.
    fn ui_component(&self, _name: Option<&str>, _operation: UiOperation) -> Option<UiComponent> {
        None
    }
}

/// A single typed node in a schema.
#[derive(Debug, Clone)]
pub enum Property {
    String(StringProperty),
    Integer(IntegerProperty),
    Boolean(BooleanProperty),
    Enum(EnumProperty),
    Array(ArrayProperty),
    Object(ObjectProperty),
    Custom(Arc<dyn CustomProperty>),
}

impl Property {
    pub(crate) fn meta(&self) -> &PropertyMeta {
        match self {
            Property::String(p) => &p.meta,
            Property::Integer(p) => &p.meta,
            Property::Boolean(p) => &p.meta,
            Property::Enum(p) => &p.meta,
            Property::Array(p) => &p.meta,
            Property::Object(p) => &p.meta,
            Property::Custom(p) => p.meta(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.meta().title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.meta().description.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.meta().required
    }

    pub fn is_nullable(&self) -> bool {
        self.meta().nullable
    }

    pub fn has_default(&self) -> bool {
        self.meta().default.is_set()
    }

    /// Resolves the property's default value.
    ///
    /// Fails with `UndefinedDefault` when no default is declared; check
    /// `has_default` first. Deferred defaults are evaluated on every call.
    pub fn get_default(&self) -> Result<Value> {
        self.meta()
            .default
            .resolve()
            .ok_or_else(|| Error::UndefinedDefault {
                property: self
                    .title()
                    .unwrap_or_else(|| self.type_name())
                    .to_string(),
            })
    }

    /// Stable variant name used in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Property::String(_) => "string",
            Property::Integer(_) => "integer",
            Property::Boolean(_) => "boolean",
            Property::Enum(_) => "enum",
            Property::Array(_) => "array",
            Property::Object(_) => "object",
            Property::Custom(p) => p.type_name(),
        }
    }

    /// Resolves the variant's own validation rule tokens for `value`.
    ///
    /// Container variants recursively register child rules into `ctx` as a
    /// side effect and return only the rules for the current path.
    pub(crate) fn resolve_validation_rules(
        &self,
        value: &Value,
        ctx: &mut RuleContext,
    ) -> Result<Vec<Rule>> {
        match self {
            Property::String(p) => Ok(p.validation_rules()),
            Property::Integer(p) => Ok(p.validation_rules()),
            Property::Boolean(p) => Ok(p.validation_rules()),
            Property::Enum(p) => p.validation_rules(),
            Property::Array(p) => p.validation_rules(value, ctx),
            Property::Object(p) => p.validation_rules(value, ctx),
            Property::Custom(p) => {
                p.validation_rules(value)
                    .ok_or_else(|| Error::MissingExportCapability {
                        type_name: p.type_name().to_string(),
                        capability: "validation rules",
                    })
            }
        }
    }
}

impl From<StringProperty> for Property {
    fn from(property: StringProperty) -> Self {
        Property::String(property)
    }
}

impl From<IntegerProperty> for Property {
    fn from(property: IntegerProperty) -> Self {
        Property::Integer(property)
    }
}

impl From<BooleanProperty> for Property {
    fn from(property: BooleanProperty) -> Self {
        Property::Boolean(property)
    }
}

impl From<EnumProperty> for Property {
    fn from(property: EnumProperty) -> Self {
        Property::Enum(property)
    }
}

impl From<ArrayProperty> for Property {
    fn from(property: ArrayProperty) -> Self {
        Property::Array(property)
    }
}

impl From<ObjectProperty> for Property {
    fn from(property: ObjectProperty) -> Self {
        Property::Object(property)
    }
}

impl From<Arc<dyn CustomProperty>> for Property {
    fn from(property: Arc<dyn CustomProperty>) -> Self {
        Property::Custom(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_default_without_default_fails() {
        let property: Property = StringProperty::new().title("Name").into();
        assert!(!property.has_default());
        assert_eq!(
            property.get_default(),
            Err(Error::UndefinedDefault {
                property: "Name".to_string()
            })
        );
    }

    #[test]
    fn test_explicit_null_default_is_reported() {
        let property: Property = StringProperty::new().default_null().into();
        assert!(property.has_default());
        assert_eq!(property.get_default(), Ok(Value::Null));
    }

    #[test]
    fn test_deferred_default_resolution() {
        let property: Property = IntegerProperty::new().default_with(|| json!(7)).into();
        assert_eq!(property.get_default(), Ok(json!(7)));
    }

    #[test]
    fn test_required_and_nullable_are_independent() {
        let property: Property = StringProperty::new().required(true).nullable(true).into();
        assert!(property.is_required());
        assert!(property.is_nullable());
    }
}
