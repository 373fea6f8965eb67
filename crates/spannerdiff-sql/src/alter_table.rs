use spannerdiff_core::{Column, Constraint};

use crate::helpers::{column_def, constraint_clause};

pub fn render_add_column(table: &str, column: &Column) -> String {
    format!("ALTER TABLE {table} ADD COLUMN {}", column_def(column))
}

pub fn render_drop_column(table: &str, column: &str) -> String {
    format!("ALTER TABLE {table} DROP COLUMN {column}")
}

/// Spanner's ALTER COLUMN replaces the whole column definition, so the
/// default is restated when the desired column has one and dropped
/// otherwise.
pub fn render_alter_column(
    table: &str,
    column: &str,
    new_type: &str,
    not_null: bool,
    default_expr: Option<&str>,
) -> String {
    let mut ddl = format!("ALTER TABLE {table} ALTER COLUMN {column} {new_type}");
    if not_null {
        ddl.push_str(" NOT NULL");
    }
    if let Some(expr) = default_expr {
        ddl.push_str(" DEFAULT ");
        ddl.push_str(expr);
    }
    ddl
}

pub fn render_add_constraint(table: &str, constraint: &Constraint) -> String {
    format!("ALTER TABLE {table} ADD {}", constraint_clause(constraint))
}

pub fn render_drop_constraint(table: &str, name: &str) -> String {
    format!("ALTER TABLE {table} DROP CONSTRAINT {name}")
}
