use spannerdiff_core::Schema;

use crate::create_index::render_create_index;
use crate::create_table::render_create_table;

/// Renders a whole schema the way a database dump is delivered: one
/// statement per object, sorted alphabetically, joined with `;\n\n`.
/// Re-parsing the result reproduces the schema.
pub fn render_schema(schema: &Schema) -> String {
    let mut statements: Vec<String> = schema
        .tables()
        .map(render_create_table)
        .chain(schema.indexes().map(render_create_index))
        .collect();
    statements.sort();
    statements.join(";\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use spannerdiff_parser::parse_schema;

    #[test]
    fn empty_schema_renders_empty() {
        assert_eq!(render_schema(&Schema::new()), "");
    }

    #[test]
    fn dump_is_sorted_and_reparses() {
        let schema = parse_schema(
            "CREATE TABLE Zebra (Id INT64 NOT NULL) PRIMARY KEY (Id);
             CREATE TABLE Alpha (Id INT64 NOT NULL) PRIMARY KEY (Id);
             CREATE INDEX IdxZebraId ON Zebra (Id);",
        )
        .unwrap();

        let dump = render_schema(&schema);
        let first = dump.lines().next().unwrap();
        assert!(first.starts_with("CREATE INDEX IdxZebraId"));
        assert_eq!(parse_schema(&dump).unwrap(), schema);
    }

    #[test]
    fn dump_snapshot() {
        let schema = parse_schema(
            "CREATE TABLE Users (Id INT64 NOT NULL, Email STRING(255)) PRIMARY KEY (Id);
             CREATE UNIQUE INDEX IdxUsersEmail ON Users (Email);",
        )
        .unwrap();

        insta::assert_snapshot!(render_schema(&schema), @r"
        CREATE TABLE Users (
          Id INT64 NOT NULL,
          Email STRING(255)
        ) PRIMARY KEY (Id);

        CREATE UNIQUE INDEX IdxUsersEmail ON Users (Email)
        ");
    }
}
