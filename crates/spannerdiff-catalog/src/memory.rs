use spannerdiff_core::Schema;
use spannerdiff_parser::parse_schema;
use spannerdiff_sql::render_schema;

use crate::apply::apply_ddls;
use crate::{Catalog, CatalogError};

/// An in-memory catalog. Mostly useful in tests: it behaves like a
/// database whose whole state is a schema.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    schema: Schema,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        MemoryCatalog::default()
    }

    pub fn from_ddl(ddl: &str) -> Result<Self, CatalogError> {
        Ok(MemoryCatalog {
            schema: parse_schema(ddl)?,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl Catalog for MemoryCatalog {
    fn dump(&mut self) -> Result<String, CatalogError> {
        Ok(render_schema(&self.schema))
    }

    fn apply(&mut self, ddls: &[String]) -> Result<(), CatalogError> {
        // Stage on a copy so a failing batch leaves no trace.
        let mut staged = self.schema.clone();
        apply_ddls(&mut staged, ddls)?;
        self.schema = staged;
        Ok(())
    }

    fn close(&mut self) -> Result<(), CatalogError> {
        Ok(())
    }
}
