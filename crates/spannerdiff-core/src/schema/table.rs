use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::{
    column::Column,
    constraint::{Constraint, ReferenceAction},
    names::{ColumnName, ConstraintName, TableName},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RowDeletionPolicy {
    pub column: ColumnName,
    pub num_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Table {
    pub name: TableName,
    pub columns: BTreeMap<ColumnName, Column>,
    pub primary_key: Vec<ColumnName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_table: Option<TableName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<ReferenceAction>,
    pub constraints: BTreeMap<ConstraintName, Constraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_deletion_policy: Option<RowDeletionPolicy>,
}

impl Table {
    pub fn new(name: impl Into<TableName>) -> Self {
        Table {
            name: name.into(),
            columns: BTreeMap::new(),
            primary_key: Vec::new(),
            parent_table: None,
            on_delete: None,
            constraints: BTreeMap::new(),
            row_deletion_policy: None,
        }
    }

    /// Columns in their declared position: by `order`, ties broken by name.
    pub fn columns_in_order(&self) -> Vec<&Column> {
        let mut cols: Vec<&Column> = self.columns.values().collect();
        cols.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        cols
    }

    /// The position the next appended column receives.
    pub fn next_column_order(&self) -> usize {
        self.columns
            .values()
            .map(|c| c.order + 1)
            .max()
            .unwrap_or(0)
    }

    /// True when the column participates in the primary key.
    pub fn is_key_column(&self, column: &str) -> bool {
        self.primary_key.iter().any(|c| c == column)
    }

    /// Tables this one depends on for creation ordering: the interleave
    /// parent plus every foreign-key target, deduplicated and sorted.
    pub fn referenced_tables(&self) -> Vec<&str> {
        let mut deps: Vec<&str> = self
            .parent_table
            .iter()
            .map(|p| p.as_str())
            .chain(
                self.constraints
                    .values()
                    .filter_map(|c| c.referenced_table()),
            )
            .filter(|t| *t != self.name)
            .collect();
        deps.sort_unstable();
        deps.dedup();
        deps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, order: usize) -> Column {
        Column {
            name: name.into(),
            r#type: "INT64".into(),
            not_null: false,
            default_expr: None,
            options: None,
            order,
        }
    }

    fn with_columns(names: &[(&str, usize)]) -> Table {
        let mut table = Table::new("t");
        for (name, order) in names {
            table.columns.insert((*name).into(), col(name, *order));
        }
        table
    }

    #[test]
    fn columns_in_order_sorts_by_position_then_name() {
        let table = with_columns(&[("b", 1), ("a", 0), ("z", 1)]);
        let names: Vec<&str> = table.columns_in_order().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "z"]);
    }

    #[test]
    fn next_column_order_follows_max() {
        assert_eq!(Table::new("t").next_column_order(), 0);
        assert_eq!(with_columns(&[("a", 0), ("b", 4)]).next_column_order(), 5);
    }

    #[test]
    fn referenced_tables_merges_parent_and_foreign_keys() {
        let mut table = Table::new("Posts");
        table.parent_table = Some("Users".into());
        table.constraints.insert(
            "FK_Posts_0".into(),
            Constraint::ForeignKey {
                name: "FK_Posts_0".into(),
                columns: vec!["CategoryId".into()],
                ref_table: "Categories".into(),
                ref_columns: vec!["Id".into()],
                on_delete: None,
            },
        );
        table.constraints.insert(
            "FK_Posts_1".into(),
            Constraint::ForeignKey {
                name: "FK_Posts_1".into(),
                columns: vec!["SelfId".into()],
                ref_table: "Posts".into(),
                ref_columns: vec!["Id".into()],
                on_delete: None,
            },
        );
        // Self-references are not dependencies.
        assert_eq!(table.referenced_tables(), vec!["Categories", "Users"]);
    }
}
