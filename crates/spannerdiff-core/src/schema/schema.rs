use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::{
    index::Index,
    names::{IndexName, TableName},
    table::Table,
};

/// A soft model-invariant violation. The differ still runs over a schema
/// carrying violations; they are surfaced as planning warnings so the user
/// can fix the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SchemaViolation {
    #[error("index {index} references unknown table {table}")]
    IndexTableMissing { index: String, table: String },
    #[error("primary key column {column} not found in table {table}")]
    PrimaryKeyColumnMissing { table: String, column: String },
    #[error("table {table} interleaves in unknown parent {parent}")]
    ParentTableMissing { table: String, parent: String },
    #[error("primary key of {table} must start with the key of its parent {parent}")]
    InterleavedKeyMismatch { table: String, parent: String },
    #[error(
        "foreign key {constraint} on {table} declares {columns} columns but references {ref_columns}"
    )]
    ForeignKeyArityMismatch {
        table: String,
        constraint: String,
        columns: usize,
        ref_columns: usize,
    },
    #[error("duplicate column order {order} in table {table}")]
    DuplicateColumnOrder { table: String, order: usize },
}

/// An in-memory schema: tables and indexes keyed by name. Iteration is
/// lexicographic by name, which the differ relies on for determinism.
/// Names are compared case-sensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Schema {
    tables: BTreeMap<TableName, Table>,
    indexes: BTreeMap<IndexName, Index>,
}

impl Schema {
    pub fn new() -> Self {
        Schema::default()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.indexes.is_empty()
    }

    /// Inserts a table, replacing any previous definition of the same name.
    pub fn insert_table(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Inserts an index, replacing any previous definition of the same name.
    pub fn insert_index(&mut self, index: Index) {
        self.indexes.insert(index.name.clone(), index);
    }

    pub fn remove_table(&mut self, name: &str) -> Option<Table> {
        self.tables.remove(name)
    }

    pub fn remove_index(&mut self, name: &str) -> Option<Index> {
        self.indexes.remove(name)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    pub fn index(&self, name: &str) -> Option<&Index> {
        self.indexes.get(name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    pub fn indexes(&self) -> impl Iterator<Item = &Index> {
        self.indexes.values()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|n| n.as_str())
    }

    pub fn index_names(&self) -> impl Iterator<Item = &str> {
        self.indexes.keys().map(|n| n.as_str())
    }

    /// Indexes declared on the given table, in name order.
    pub fn indexes_on(&self, table: &str) -> impl Iterator<Item = &Index> {
        self.indexes.values().filter(move |i| i.table_name == table)
    }

    /// Tables interleaved directly under the given table, in name order.
    pub fn children_of(&self, table: &str) -> impl Iterator<Item = &Table> {
        self.tables
            .values()
            .filter(move |t| t.parent_table.as_deref() == Some(table))
    }

    /// Checks the model invariants and returns every violation found.
    pub fn validate(&self) -> Vec<SchemaViolation> {
        let mut violations = Vec::new();

        for index in self.indexes.values() {
            if !self.tables.contains_key(&index.table_name) {
                violations.push(SchemaViolation::IndexTableMissing {
                    index: index.name.clone(),
                    table: index.table_name.clone(),
                });
            }
        }

        for table in self.tables.values() {
            for key in &table.primary_key {
                if !table.columns.contains_key(key) {
                    violations.push(SchemaViolation::PrimaryKeyColumnMissing {
                        table: table.name.clone(),
                        column: key.clone(),
                    });
                }
            }

            let mut orders: Vec<usize> = table.columns.values().map(|c| c.order).collect();
            orders.sort_unstable();
            for pair in orders.windows(2) {
                if pair[0] == pair[1] {
                    violations.push(SchemaViolation::DuplicateColumnOrder {
                        table: table.name.clone(),
                        order: pair[0],
                    });
                }
            }

            if let Some(parent_name) = &table.parent_table {
                match self.tables.get(parent_name) {
                    None => violations.push(SchemaViolation::ParentTableMissing {
                        table: table.name.clone(),
                        parent: parent_name.clone(),
                    }),
                    Some(parent) => {
                        let prefix_matches = table.primary_key.len() >= parent.primary_key.len()
                            && table
                                .primary_key
                                .iter()
                                .zip(&parent.primary_key)
                                .all(|(a, b)| a == b);
                        if !prefix_matches {
                            violations.push(SchemaViolation::InterleavedKeyMismatch {
                                table: table.name.clone(),
                                parent: parent_name.clone(),
                            });
                        }
                    }
                }
            }

            for constraint in table.constraints.values() {
                if let crate::schema::Constraint::ForeignKey {
                    name,
                    columns,
                    ref_columns,
                    ..
                } = constraint
                    && columns.len() != ref_columns.len()
                {
                    violations.push(SchemaViolation::ForeignKeyArityMismatch {
                        table: table.name.clone(),
                        constraint: name.clone(),
                        columns: columns.len(),
                        ref_columns: ref_columns.len(),
                    });
                }
            }
        }

        violations
    }
}
