use spannerdiff_config::FilterConfig;
use spannerdiff_core::Schema;

/// Applies table filtering. Indexes survive only when their owning table
/// does. Filtering runs on both sides before diffing, so out-of-scope
/// tables look identical and yield no ops.
pub fn filter_schema(schema: &Schema, filter: &FilterConfig) -> Schema {
    if filter.is_empty() {
        return schema.clone();
    }
    let mut filtered = Schema::new();
    for table in schema.tables() {
        if filter.retains(&table.name) {
            filtered.insert_table(table.clone());
        }
    }
    for index in schema.indexes() {
        if filter.retains(&index.table_name) {
            filtered.insert_index(index.clone());
        }
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use spannerdiff_parser::parse_schema;

    fn schema() -> Schema {
        parse_schema(
            "CREATE TABLE Users (Id INT64 NOT NULL, Name STRING(100)) PRIMARY KEY (Id);
             CREATE TABLE Posts (Id INT64 NOT NULL) PRIMARY KEY (Id);
             CREATE INDEX IdxUsersName ON Users (Name);
             CREATE INDEX IdxPostsId ON Posts (Id);",
        )
        .unwrap()
    }

    #[test]
    fn skip_list_removes_table_and_its_indexes() {
        let filter = FilterConfig {
            target_tables: vec![],
            skip_tables: vec!["Posts".into()],
        };
        let filtered = filter_schema(&schema(), &filter);
        assert_eq!(filtered.table_names().collect::<Vec<_>>(), vec!["Users"]);
        assert_eq!(
            filtered.index_names().collect::<Vec<_>>(),
            vec!["IdxUsersName"]
        );
    }

    #[test]
    fn allowlist_keeps_only_listed_tables() {
        let filter = FilterConfig {
            target_tables: vec!["Posts".into()],
            skip_tables: vec![],
        };
        let filtered = filter_schema(&schema(), &filter);
        assert_eq!(filtered.table_names().collect::<Vec<_>>(), vec!["Posts"]);
        assert_eq!(
            filtered.index_names().collect::<Vec<_>>(),
            vec!["IdxPostsId"]
        );
    }

    #[test]
    fn empty_filter_is_identity() {
        let original = schema();
        assert_eq!(filter_schema(&original, &FilterConfig::default()), original);
    }
}
