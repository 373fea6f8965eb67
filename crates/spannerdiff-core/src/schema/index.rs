use serde::{Deserialize, Serialize};

use crate::schema::names::{ColumnName, IndexName, TableName};

/// A secondary index. Key columns and storing columns are both
/// positional; changing either means the index must be recreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Index {
    pub name: IndexName,
    pub table_name: TableName,
    pub columns: Vec<ColumnName>,
    pub unique: bool,
    pub null_filtered: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub storing: Vec<ColumnName>,
}
