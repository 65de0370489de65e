//! High-level operations that correspond to CLI commands
//!
//! These modules hold the logic behind each recolor command, separated from
//! CLI concerns like argument parsing and printing.

pub mod mapping;
pub mod replace;

pub use mapping::{mapping_operation, resolve_mapping, MappingSource, ResolvedMapping};
pub use replace::replace_operation;
