pub mod cancel;
pub mod filter;
pub mod run;

pub use cancel::CancelToken;
pub use filter::filter_schema;
pub use run::{CatalogOp, DdlSource, Options, RunError, RunOutcome, generate_ddls, run};

// Re-export the pieces callers usually need alongside the orchestrator.
pub use spannerdiff_catalog::{Catalog, CatalogError, DatabaseConfig, FileCatalog, MemoryCatalog};
pub use spannerdiff_config::{ConfigError, FilterConfig};
pub use spannerdiff_core::{
    Column, Constraint, Index, Plan, PlanOp, PlanStatement, ReferenceAction, RowDeletionPolicy,
    Schema, SchemaViolation, Table, UnsupportedChange, UnsupportedChangeKind,
};
pub use spannerdiff_parser::{ParseError, parse_schema};
pub use spannerdiff_planner::{PlannerError, diff_schemas, plan_changes};
pub use spannerdiff_sql::render_schema;
