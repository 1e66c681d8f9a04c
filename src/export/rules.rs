// Validation-rule exporter.
//
// Flattens a schema into a mapping from dotted path to an ordered rule
// list, ready to hand to an external rule-based validation engine. Paths
// are built with an explicit stack pushed/popped around recursive calls;
// the accumulator is allocated fresh for every export call.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::export::SchemaExporter;
use crate::internal::error::Result;
use crate::property::{AdditionalProperties, ObjectProperty, Property};
use crate::schema::Schema;

/// One validation rule: either an opaque token consumed by the external
/// engine, or a named predicate evaluated against the value in place.
#[derive(Clone)]
pub enum Rule {
    Token(String),
    Check {
        label: String,
        assert: Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>,
    },
}

impl Rule {
    pub fn token(token: impl Into<String>) -> Self {
        Rule::Token(token.into())
    }

    /// A predicate rule; `assert` returns an error message on failure.
    pub fn check(
        label: impl Into<String>,
        assert: impl Fn(&Value) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Rule::Check {
            label: label.into(),
            assert: Arc::new(assert),
        }
    }

    /// The token text or predicate label.
    pub fn name(&self) -> &str {
        match self {
            Rule::Token(token) => token,
            Rule::Check { label, .. } => label,
        }
    }

    /// Runs a predicate rule against `value`; tokens always pass here
    /// because their semantics belong to the external engine.
    pub fn evaluate(&self, value: &Value) -> Option<String> {
        match self {
            Rule::Token(_) => None,
            Rule::Check { assert, .. } => assert(value),
        }
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Rule::Token(a), Rule::Token(b)) => a == b,
            (Rule::Check { label: a, .. }, Rule::Check { label: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Token(token) => f.debug_tuple("Token").field(token).finish(),
            Rule::Check { label, .. } => f.debug_tuple("Check").field(label).finish(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Flattened export output: dotted path to ordered rule list.
pub type RuleSet = BTreeMap<String, Vec<Rule>>;

/// Per-call accumulator: the rule table plus the path stack used to build
/// dotted addresses for nested properties.
#[derive(Debug, Default)]
pub struct RuleContext {
    rules: RuleSet,
    path_stack: Vec<String>,
    prepend: Vec<Rule>,
}

impl RuleContext {
    fn with_prepend(prepend: Vec<Rule>) -> Self {
        Self {
            prepend,
            ..Self::default()
        }
    }

    /// Registers a child property's rules at `segment` under the current
    /// path, prefixed with `present`/`nullable` as its metadata dictates.
    /// Descendants register themselves recursively during this call.
    pub(crate) fn export_child(
        &mut self,
        property: &Property,
        segment: &str,
        value: &Value,
    ) -> Result<()> {
        let mut list = self.prepend.clone();
        // `present` instead of `required`: required fails on null, which
        // would conflate requiredness with nullability.
        if property.is_required() {
            list.push(Rule::token("present"));
        }
        if property.is_nullable() {
            list.push(Rule::token("nullable"));
        }

        self.path_stack.push(segment.to_string());
        let own = property.resolve_validation_rules(value, self);
        let result = own.map(|own| {
            list.extend(own);
            let path = self.dotted_path();
            trace!(path = %path, rules = list.len(), "registered validation rules");
            self.rules.insert(path, list);
        });
        self.path_stack.pop();
        result
    }

    /// Registers a fixed rule list at `segment` under the current path,
    /// bypassing property metadata (used for undeclared input keys).
    pub(crate) fn set_child_rules(&mut self, segment: &str, rules: Vec<Rule>) {
        self.path_stack.push(segment.to_string());
        let path = self.dotted_path();
        self.rules.insert(path, rules);
        self.path_stack.pop();
    }

    fn dotted_path(&self) -> String {
        self.path_stack
            .iter()
            .filter(|segment| !segment.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(".")
    }

    pub(crate) fn into_rules(self) -> RuleSet {
        self.rules
    }
}

/// Exports a schema into a path-addressed validation rule set.
///
/// The exporter captures the input data so container properties can walk
/// concrete values (per-index array items, undeclared object keys).
#[derive(Debug, Default)]
pub struct ValidationRulesExporter {
    data: Value,
    prepend: Vec<Rule>,
}

impl ValidationRulesExporter {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            prepend: Vec::new(),
        }
    }

    /// Rules prefixed to every registered path, e.g. a `bail` token.
    pub fn with_prepend(mut self, prepend: Vec<Rule>) -> Self {
        self.prepend = prepend;
        self
    }
}

impl SchemaExporter for ValidationRulesExporter {
    type Output = RuleSet;

    fn export_schema(&self, schema: &Schema) -> Result<RuleSet> {
        debug!(schema = %schema.identifier(), "exporting validation rules");

        // The root is wrapped as a plain object and is itself never an
        // addressable field, so it carries no present/nullable prefix and
        // its own token list is discarded.
        let mut root = ObjectProperty::new()
            .required(false)
            .nullable(false)
            .additional_properties(AdditionalProperties::Deny)
            .properties(schema.properties().iter().cloned())?;
        if let Some(title) = schema.title() {
            root = root.title(title);
        }
        if let Some(description) = schema.description() {
            root = root.description(description);
        }

        let mut ctx = RuleContext::with_prepend(self.prepend.clone());
        root.validation_rules(&self.data, &mut ctx)?;

        Ok(ctx.into_rules())
    }
}
