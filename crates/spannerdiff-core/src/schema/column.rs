use serde::{Deserialize, Serialize};

use crate::schema::names::ColumnName;

/// A single table column. `r#type` holds the normalized SQL type text
/// (e.g. `INT64`, `STRING(MAX)`, `ARRAY<STRING(50)>`) and `default_expr`
/// keeps its surrounding parentheses, e.g. `(CURRENT_TIMESTAMP())`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Column {
    pub name: ColumnName,
    pub r#type: String,
    pub not_null: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_expr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    pub order: usize,
}

impl Column {
    /// True when the attributes the differ compares changed: type,
    /// nullability, or default. Column options and position are not
    /// alterable and are ignored here.
    pub fn differs_from(&self, other: &Column) -> bool {
        self.r#type != other.r#type
            || self.not_null != other.not_null
            || self.default_expr != other.default_expr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(ty: &str, not_null: bool, default_expr: Option<&str>) -> Column {
        Column {
            name: "c".into(),
            r#type: ty.to_string(),
            not_null,
            default_expr: default_expr.map(|s| s.to_string()),
            options: None,
            order: 0,
        }
    }

    #[test]
    fn differs_on_type() {
        assert!(col("INT64", false, None).differs_from(&col("STRING(10)", false, None)));
    }

    #[test]
    fn differs_on_not_null() {
        assert!(col("INT64", true, None).differs_from(&col("INT64", false, None)));
    }

    #[test]
    fn differs_on_default() {
        assert!(col("INT64", false, Some("(1)")).differs_from(&col("INT64", false, None)));
    }

    #[test]
    fn options_and_order_do_not_differ() {
        let mut a = col("INT64", false, None);
        let mut b = a.clone();
        a.options = Some("OPTIONS (allow_commit_timestamp=true)".into());
        b.order = 7;
        assert!(!a.differs_from(&b));
    }
}
