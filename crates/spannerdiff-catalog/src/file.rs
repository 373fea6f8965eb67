use std::fs;
use std::path::{Path, PathBuf};

use spannerdiff_core::Schema;
use spannerdiff_parser::parse_schema;
use spannerdiff_sql::render_schema;

use crate::apply::apply_ddls;
use crate::{Catalog, CatalogError, DatabaseConfig};

/// A catalog rooted at a state directory, holding each database's schema
/// as canonical DDL text at `<root>/<project>/<instance>/<database>.sql`.
/// This stands in for the admin-API transport in tests and offline runs; a
/// network-backed catalog plugs in behind the same trait.
#[derive(Debug)]
pub struct FileCatalog {
    path: PathBuf,
    database: String,
}

impl FileCatalog {
    pub fn new(root: impl AsRef<Path>, config: &DatabaseConfig) -> Self {
        let path = root
            .as_ref()
            .join(&config.project_id)
            .join(&config.instance_id)
            .join(format!("{}.sql", config.database_id));
        FileCatalog {
            path,
            database: config.database_path(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the database with an empty schema. Existing state is left
    /// untouched.
    pub fn create_database(&self) -> Result<(), CatalogError> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, "")?;
        Ok(())
    }

    fn read_schema(&self) -> Result<Schema, CatalogError> {
        if !self.path.exists() {
            return Err(CatalogError::DatabaseNotFound(self.database.clone()));
        }
        let text = fs::read_to_string(&self.path)?;
        Ok(parse_schema(&text)?)
    }
}

impl Catalog for FileCatalog {
    fn dump(&mut self) -> Result<String, CatalogError> {
        Ok(render_schema(&self.read_schema()?))
    }

    fn apply(&mut self, ddls: &[String]) -> Result<(), CatalogError> {
        let mut schema = self.read_schema()?;
        apply_ddls(&mut schema, ddls)?;
        fs::write(&self.path, render_schema(&schema))?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), CatalogError> {
        Ok(())
    }
}
