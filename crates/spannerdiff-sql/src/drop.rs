pub fn render_drop_table(table: &str) -> String {
    format!("DROP TABLE {table}")
}

pub fn render_drop_index(name: &str) -> String {
    format!("DROP INDEX {name}")
}
