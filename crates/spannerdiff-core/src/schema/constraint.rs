use serde::{Deserialize, Serialize};

use crate::schema::names::{ColumnName, ConstraintName, TableName};

/// Referential action attached to a foreign key or an interleave clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceAction {
    Cascade,
    NoAction,
}

impl ReferenceAction {
    /// The literal clause text, e.g. `ON DELETE CASCADE`.
    pub fn as_sql(&self) -> &'static str {
        match self {
            ReferenceAction::Cascade => "ON DELETE CASCADE",
            ReferenceAction::NoAction => "ON DELETE NO ACTION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Constraint {
    Check {
        name: ConstraintName,
        /// Expression text including its outer parentheses.
        expr: String,
    },
    ForeignKey {
        name: ConstraintName,
        columns: Vec<ColumnName>,
        ref_table: TableName,
        ref_columns: Vec<ColumnName>,
        #[serde(skip_serializing_if = "Option::is_none")]
        on_delete: Option<ReferenceAction>,
    },
}

impl Constraint {
    pub fn name(&self) -> &str {
        match self {
            Constraint::Check { name, .. } => name,
            Constraint::ForeignKey { name, .. } => name,
        }
    }

    /// The table a foreign key points at, if this is one.
    pub fn referenced_table(&self) -> Option<&str> {
        match self {
            Constraint::ForeignKey { ref_table, .. } => Some(ref_table),
            Constraint::Check { .. } => None,
        }
    }
}
