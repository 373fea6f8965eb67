pub mod apply;
pub mod file;
pub mod memory;

pub use file::FileCatalog;
pub use memory::MemoryCatalog;

use spannerdiff_parser::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("database not found: {0}")]
    DatabaseNotFound(String),
    #[error("invalid ddl in batch: {0}")]
    InvalidDdl(#[from] ParseError),
    #[error("cannot apply statement: {0}")]
    Apply(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Identifies one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub project_id: String,
    pub instance_id: String,
    pub database_id: String,
}

impl DatabaseConfig {
    /// The fully qualified resource path,
    /// `projects/<p>/instances/<i>/databases/<d>`.
    pub fn database_path(&self) -> String {
        format!(
            "projects/{}/instances/{}/databases/{}",
            self.project_id, self.instance_id, self.database_id
        )
    }
}

/// What the orchestrator needs from a database: a canonical schema dump
/// and atomic DDL batch execution. `dump` returns statements sorted
/// alphabetically, joined with `;\n\n`. `apply` is fail-fast: on error the
/// batch leaves no trace.
pub trait Catalog {
    fn dump(&mut self) -> Result<String, CatalogError>;
    fn apply(&mut self, ddls: &[String]) -> Result<(), CatalogError>;
    fn close(&mut self) -> Result<(), CatalogError>;
}
