use spannerdiff_core::Index;

/// `CREATE [UNIQUE ][NULL_FILTERED ]INDEX <n> ON <t> (<cols>)[ STORING (<cols>)]`
pub fn render_create_index(index: &Index) -> String {
    let mut ddl = String::from("CREATE ");
    if index.unique {
        ddl.push_str("UNIQUE ");
    }
    if index.null_filtered {
        ddl.push_str("NULL_FILTERED ");
    }
    ddl.push_str(&format!(
        "INDEX {} ON {} ({})",
        index.name,
        index.table_name,
        index.columns.join(", ")
    ));
    if !index.storing.is_empty() {
        ddl.push_str(&format!(" STORING ({})", index.storing.join(", ")));
    }
    ddl
}
