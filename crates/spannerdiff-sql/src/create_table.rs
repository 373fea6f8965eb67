use spannerdiff_core::Table;

use crate::helpers::{column_def, constraint_clause};

/// Renders a full CREATE TABLE statement, without a trailing semicolon.
/// Columns appear by stored position, constraints alphabetically.
pub fn render_create_table(table: &Table) -> String {
    let mut ddl = format!("CREATE TABLE {} (\n", table.name);

    let defs: Vec<String> = table
        .columns_in_order()
        .iter()
        .map(|c| format!("  {}", column_def(c)))
        .collect();
    ddl.push_str(&defs.join(",\n"));

    for constraint in table.constraints.values() {
        ddl.push_str(",\n  ");
        ddl.push_str(&constraint_clause(constraint));
    }

    if table.primary_key.is_empty() {
        ddl.push_str("\n)");
    } else {
        ddl.push_str(&format!("\n) PRIMARY KEY ({})", table.primary_key.join(", ")));
    }

    if let Some(parent) = &table.parent_table {
        ddl.push_str(",\n");
        ddl.push_str(&format!("INTERLEAVE IN PARENT {parent}"));
        if let Some(action) = &table.on_delete {
            ddl.push(' ');
            ddl.push_str(action.as_sql());
        }
    }

    if let Some(policy) = &table.row_deletion_policy {
        ddl.push_str(",\n");
        ddl.push_str(&format!(
            "ROW DELETION POLICY (OLDER_THAN({}, INTERVAL {} DAY))",
            policy.column, policy.num_days
        ));
    }

    ddl
}
