//! CLI command handlers, one per file.

mod probe;
mod query;

pub use probe::run_probe;
pub use query::run_query;
