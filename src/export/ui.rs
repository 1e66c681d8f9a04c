// UI description exporter.
//
// Renders a schema into a serializable tree of widget descriptors. The
// descriptors are toolkit-agnostic; an external UI layer decides how each
// widget kind is drawn.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::export::SchemaExporter;
use crate::internal::error::{Error, Result};
use crate::property::{EnumCase, Property, StringFormat};
use crate::schema::Schema;

/// The operation a form is rendered for. `View` produces read-only
/// display descriptors instead of inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiOperation {
    Create,
    Edit,
    View,
}

/// One selectable choice of a `Select` widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: Value,
    pub label: String,
}

impl SelectOption {
    fn from_case(case: &EnumCase) -> Self {
        Self {
            value: case.value().clone(),
            label: case
                .label()
                .map(str::to_string)
                .unwrap_or_else(|| case.value_token()),
        }
    }
}

/// Read-only rendering of a leaf value under the `View` operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayFormat {
    Text,
    Markdown,
    Html,
    Date,
    DateTime,
    Numeric,
    YesNo,
    /// Value shown through its case label.
    Labelled(Vec<SelectOption>),
}

/// The widget kind of a component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UiWidget {
    TextInput {
        format: Option<StringFormat>,
        min_length: Option<u64>,
        max_length: Option<u64>,
        pattern: Option<String>,
    },
    NumberInput {
        // Exclusive bounds are not representable in a number input;
        // the validation-rule target enforces them.
        minimum: Option<i64>,
        maximum: Option<i64>,
        step: Option<i64>,
    },
    ToggleButtons {
        accepted: bool,
        nullable: bool,
    },
    Select {
        options: Vec<SelectOption>,
        nullable: bool,
    },
    Repeater {
        item: Option<Box<UiComponent>>,
        min_items: Option<u64>,
        max_items: Option<u64>,
        unique_items: bool,
    },
    Section {
        children: Vec<UiComponent>,
    },
    Display {
        format: DisplayFormat,
    },
}

impl UiWidget {
    /// Whether the widget accepts input (and can carry a required flag).
    fn is_input(&self) -> bool {
        !matches!(self, UiWidget::Section { .. } | UiWidget::Display { .. })
    }
}

/// One exported component: widget plus the uniformly applied decoration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiComponent {
    pub name: Option<String>,
    pub label: Option<String>,
    pub help: Option<String>,
    pub required: bool,
    pub default: Option<Value>,
    pub widget: UiWidget,
}

type ModifyHook = Box<dyn Fn(&Property, Option<&str>, &mut UiComponent) + Send + Sync>;

/// Exports a schema into UI component descriptors, one per top-level
/// property, in declaration order.
pub struct UiExporter {
    operation: UiOperation,
    modify: Option<ModifyHook>,
}

impl UiExporter {
    pub fn new(operation: UiOperation) -> Self {
        Self {
            operation,
            modify: None,
        }
    }

    /// Hook run on every exported component after decoration.
    pub fn modify_components(
        mut self,
        hook: impl Fn(&Property, Option<&str>, &mut UiComponent) + Send + Sync + 'static,
    ) -> Self {
        self.modify = Some(Box::new(hook));
        self
    }

    pub fn operation(&self) -> UiOperation {
        self.operation
    }

    /// Exports one property into a component.
    pub fn export(&self, property: &Property, name: Option<&str>) -> Result<UiComponent> {
        let mut component = match property {
            Property::Custom(custom) => custom.ui_component(name, self.operation).ok_or_else(
                || Error::MissingExportCapability {
                    type_name: custom.type_name().to_string(),
                    capability: "UI components",
                },
            )?,
            _ => UiComponent {
                name: name.map(str::to_string),
                label: None,
                help: None,
                required: false,
                default: None,
                widget: self.widget_for(property)?,
            },
        };

        // Uniform decoration, independent of the variant.
        if property.has_default() && self.operation != UiOperation::View {
            component.default = Some(property.get_default()?);
        }
        if self.operation != UiOperation::View
            && component.widget.is_input()
            && !property.is_nullable()
        {
            component.required = property.is_required();
        }
        if component.label.is_none() {
            component.label = property.title().map(str::to_string);
        }
        if component.help.is_none() {
            component.help = property.description().map(str::to_string);
        }

        if let Some(hook) = &self.modify {
            hook(property, name, &mut component);
        }

        Ok(component)
    }

    fn widget_for(&self, property: &Property) -> Result<UiWidget> {
        let viewing = self.operation == UiOperation::View;

        let widget = match property {
            Property::String(p) => {
                if viewing {
                    let format = match p.format {
                        Some(StringFormat::Markdown) => DisplayFormat::Markdown,
                        Some(StringFormat::Html) => DisplayFormat::Html,
                        Some(StringFormat::Date) => DisplayFormat::Date,
                        Some(StringFormat::DateTime) => DisplayFormat::DateTime,
                        _ => DisplayFormat::Text,
                    };
                    UiWidget::Display { format }
                } else {
                    UiWidget::TextInput {
                        format: p.format,
                        min_length: p.min_length,
                        max_length: p.max_length,
                        pattern: p.pattern.clone(),
                    }
                }
            }
            Property::Integer(p) => {
                if viewing {
                    UiWidget::Display {
                        format: DisplayFormat::Numeric,
                    }
                } else {
                    UiWidget::NumberInput {
                        minimum: p.minimum,
                        maximum: p.maximum,
                        step: p.multiple_of,
                    }
                }
            }
            Property::Boolean(p) => {
                if viewing {
                    UiWidget::Display {
                        format: DisplayFormat::YesNo,
                    }
                } else {
                    UiWidget::ToggleButtons {
                        accepted: p.accepted,
                        nullable: property.is_nullable(),
                    }
                }
            }
            Property::Enum(p) => {
                let options = p
                    .resolved_cases()?
                    .iter()
                    .map(SelectOption::from_case)
                    .collect();
                if viewing {
                    UiWidget::Display {
                        format: DisplayFormat::Labelled(options),
                    }
                } else {
                    UiWidget::Select {
                        options,
                        nullable: property.is_nullable(),
                    }
                }
            }
            Property::Array(p) => {
                let item = match p.item_property() {
                    Some(item) => Some(Box::new(self.export(item, None)?)),
                    None => None,
                };
                UiWidget::Repeater {
                    item,
                    min_items: p.min_items,
                    max_items: p.max_items,
                    unique_items: p.unique_items,
                }
            }
            Property::Object(p) => {
                let children = p
                    .properties
                    .iter()
                    .map(|(child_name, child)| self.export(child, Some(child_name)))
                    .collect::<Result<Vec<_>>>()?;
                UiWidget::Section { children }
            }
            Property::Custom(_) => unreachable!("custom variants are handled by export"),
        };

        Ok(widget)
    }
}

impl SchemaExporter for UiExporter {
    type Output = Vec<UiComponent>;

    fn export_schema(&self, schema: &Schema) -> Result<Vec<UiComponent>> {
        debug!(schema = %schema.identifier(), operation = ?self.operation, "exporting UI components");

        schema
            .properties()
            .iter()
            .map(|(name, property)| self.export(property, Some(name)))
            .collect()
    }
}
