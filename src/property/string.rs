// String property variant.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::export::rules::Rule;
use crate::property::{impl_meta_builders, PropertyMeta};

/// Well-known string formats.
///
/// Most map onto JSON Schema `format` names; `Markdown` and `Html` are
/// presentation-only and are skipped in the JSON Schema output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StringFormat {
    Date,
    DateTime,
    Duration,
    Email,
    Hostname,
    Ipv4,
    Ipv6,
    Phone,
    Regex,
    Time,
    Url,
    Uuid,
    Markdown,
    Html,
}

impl StringFormat {
    /// The JSON Schema `format` name, or `None` for non-standard formats.
    pub fn json_schema_format(&self) -> Option<&'static str> {
        match self {
            StringFormat::Date => Some("date"),
            StringFormat::DateTime => Some("date-time"),
            StringFormat::Duration => Some("duration"),
            StringFormat::Email => Some("email"),
            StringFormat::Hostname => Some("hostname"),
            StringFormat::Ipv4 => Some("ipv4"),
            StringFormat::Ipv6 => Some("ipv6"),
            StringFormat::Phone => Some("phone"),
            StringFormat::Regex => Some("regex"),
            StringFormat::Time => Some("time"),
            StringFormat::Url => Some("url"),
            StringFormat::Uuid => Some("uuid"),
            StringFormat::Markdown | StringFormat::Html => None,
        }
    }

    /// Validation rule tokens for the format.
    ///
    /// Formats without a matching validator rule (hostname, phone,
    /// duration, regex, markdown, html) contribute nothing.
    fn rule_tokens(&self) -> Vec<Rule> {
        match self {
            StringFormat::Email => vec![Rule::token("email")],
            StringFormat::Url => vec![Rule::token("url")],
            StringFormat::Ipv4 => vec![Rule::token("ipv4")],
            StringFormat::Ipv6 => vec![Rule::token("ipv6")],
            StringFormat::Uuid => vec![Rule::token("uuid")],
            StringFormat::Date | StringFormat::DateTime => vec![Rule::token("date")],
            StringFormat::Time => vec![Rule::token("date"), Rule::token("date_format:H:i:s")],
            _ => Vec::new(),
        }
    }
}

/// A UTF-8 string property.
#[derive(Debug, Clone, Default)]
pub struct StringProperty {
    pub(crate) meta: PropertyMeta,
    pub(crate) format: Option<StringFormat>,
    pub(crate) min_length: Option<u64>,
    pub(crate) max_length: Option<u64>,
    pub(crate) pattern: Option<String>,
}

impl_meta_builders!(StringProperty);

impl StringProperty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(mut self, format: StringFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn min_length(mut self, min_length: u64) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn max_length(mut self, max_length: u64) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// A regular expression the value must match. Accepts either a bare
    /// pattern or an already-delimited `/pattern/flags` form.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub(crate) fn json_fragment(&self) -> Map<String, Value> {
        let mut fragment = Map::new();
        fragment.insert("type".to_string(), json!("string"));

        if let Some(name) = self.format.and_then(|f| f.json_schema_format()) {
            fragment.insert("format".to_string(), json!(name));
        }
        if let Some(min_length) = self.min_length {
            fragment.insert("minLength".to_string(), json!(min_length));
        }
        if let Some(max_length) = self.max_length {
            fragment.insert("maxLength".to_string(), json!(max_length));
        }
        if let Some(pattern) = &self.pattern {
            fragment.insert("pattern".to_string(), json!(pattern));
        }

        fragment
    }

    pub(crate) fn validation_rules(&self) -> Vec<Rule> {
        let mut rules = vec![Rule::token("string")];

        if let Some(min_length) = self.min_length {
            rules.push(Rule::token(format!("min:{min_length}")));
        }
        if let Some(max_length) = self.max_length {
            rules.push(Rule::token(format!("max:{max_length}")));
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.is_empty() {
                rules.push(Rule::token(format!("regex:{}", delimit_pattern(pattern))));
            }
        }
        if let Some(format) = self.format {
            rules.extend(format.rule_tokens());
        }

        rules
    }
}

/// Wraps a bare pattern in `/…/u` delimiters, escaping inner slashes.
/// Already-delimited patterns (`/…/flags`) are passed through untouched.
fn delimit_pattern(pattern: &str) -> String {
    if is_delimited(pattern) {
        return pattern.to_string();
    }
    format!("/{}/u", pattern.replace('/', "\\/"))
}

fn is_delimited(pattern: &str) -> bool {
    let Some(body) = pattern.strip_prefix('/') else {
        return false;
    };
    match body.rfind('/') {
        Some(end) if end > 0 => body[end + 1..].chars().all(|c| c.is_ascii_alphabetic()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_fragment_with_constraints() {
        let fragment = StringProperty::new()
            .format(StringFormat::Email)
            .min_length(2)
            .max_length(64)
            .pattern("^[a-z]+$")
            .json_fragment();

        assert_eq!(
            Value::Object(fragment),
            json!({
                "type": "string",
                "format": "email",
                "minLength": 2,
                "maxLength": 64,
                "pattern": "^[a-z]+$",
            })
        );
    }

    #[test]
    fn test_presentation_formats_have_no_json_schema_name() {
        assert_eq!(StringFormat::Markdown.json_schema_format(), None);
        assert_eq!(StringFormat::Html.json_schema_format(), None);
        assert_eq!(StringFormat::DateTime.json_schema_format(), Some("date-time"));
    }

    #[test]
    fn test_validation_rules_wrap_bare_pattern() {
        let rules = StringProperty::new()
            .min_length(2)
            .pattern("^a/b$")
            .validation_rules();

        assert_eq!(
            rules,
            vec![
                Rule::token("string"),
                Rule::token("min:2"),
                Rule::token("regex:/^a\\/b$/u"),
            ]
        );
    }

    #[test]
    fn test_validation_rules_keep_delimited_pattern() {
        let rules = StringProperty::new().pattern("/^[0-9]+$/i").validation_rules();
        assert_eq!(
            rules,
            vec![Rule::token("string"), Rule::token("regex:/^[0-9]+$/i")]
        );
    }

    #[test]
    fn test_time_format_rules() {
        let rules = StringProperty::new().format(StringFormat::Time).validation_rules();
        assert_eq!(
            rules,
            vec![
                Rule::token("string"),
                Rule::token("date"),
                Rule::token("date_format:H:i:s"),
            ]
        );
    }
}
