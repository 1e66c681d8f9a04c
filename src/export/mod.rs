// Export targets for a composed schema.
//
// Each exporter walks the schema/property tree and produces one target
// representation. Exporters are stateless per call: mutable accumulation
// lives in per-call context values, never on the exporter itself, so one
// exporter instance may serve concurrent exports.

pub mod json_schema;
pub mod rules;
pub mod ui;

use crate::internal::error::Result;
use crate::schema::Schema;

/// Contract between a `Schema` and one export target.
pub trait SchemaExporter {
    type Output;

    /// Renders the whole schema into this exporter's representation.
    /// All-or-nothing: the first failure aborts the export.
    fn export_schema(&self, schema: &Schema) -> Result<Self::Output>;
}
