use thiserror::Error;

/// Unified error type for the polyschema library.
///
/// Every variant signals a programmer error: a malformed schema composition
/// or a misuse of the property API. None are transient, none are retried,
/// and the first failure aborts the whole operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A property name collided with an existing one during composition.
    #[error("property '{name}' already exists in '{scope}'")]
    DuplicateProperty { scope: String, name: String },

    /// A property is marked required but also declares a default value.
    /// A default implies the key may be omitted, which contradicts required.
    #[error("property '{name}' is required but declares a default value")]
    InvalidComposition { name: String },

    /// `get_default` was called on a property without a default.
    /// Callers must check `has_default` first.
    #[error("property '{property}' does not have a default value defined")]
    UndefinedDefault { property: String },

    /// An exporter was handed a property variant that does not implement
    /// the capability this exporter requires.
    #[error("property type '{type_name}' does not support {capability} export")]
    MissingExportCapability {
        type_name: String,
        capability: &'static str,
    },

    /// An enum property's cases were requested before a resolver was set.
    #[error("no enum source configured; set cases or a resolver before accessing enum cases")]
    UnresolvedEnumSource,
}

/// A specialized `Result` type for polyschema operations.
pub type Result<T> = std::result::Result<T, Error>;
