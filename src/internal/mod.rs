// Internal shared utilities for the polyschema library.

pub mod error;
