use spannerdiff_core::{Column, Constraint};

/// One column definition without leading indentation:
/// `<name> <type>[ NOT NULL][ DEFAULT <expr>][ OPTIONS (...)]`.
pub fn column_def(column: &Column) -> String {
    let mut def = format!("{} {}", column.name, column.r#type);
    if column.not_null {
        def.push_str(" NOT NULL");
    }
    if let Some(default_expr) = &column.default_expr {
        def.push_str(" DEFAULT ");
        def.push_str(default_expr);
    }
    if let Some(options) = &column.options {
        def.push(' ');
        def.push_str(options);
    }
    def
}

/// A constraint clause starting with the CONSTRAINT keyword.
pub fn constraint_clause(constraint: &Constraint) -> String {
    match constraint {
        Constraint::Check { name, expr } => {
            format!("CONSTRAINT {name} CHECK {expr}")
        }
        Constraint::ForeignKey {
            name,
            columns,
            ref_table,
            ref_columns,
            on_delete,
        } => {
            let mut clause = format!(
                "CONSTRAINT {name} FOREIGN KEY ({}) REFERENCES {ref_table} ({})",
                columns.join(", "),
                ref_columns.join(", ")
            );
            if let Some(action) = on_delete {
                clause.push(' ');
                clause.push_str(action.as_sql());
            }
            clause
        }
    }
}
