use serde::{Deserialize, Serialize};

use crate::schema::{
    Column, ColumnName, Constraint, ConstraintName, Index, IndexName, SchemaViolation, Table,
    TableName,
};

/// The category of schema change Spanner cannot apply in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedChangeKind {
    PrimaryKey,
    Interleave,
    OnDelete,
    RowDeletionPolicy,
    KeyColumn,
}

/// A desired change the differ refuses to plan. Surfaced as a warning by
/// default; fatal in strict mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UnsupportedChange {
    pub kind: UnsupportedChangeKind,
    pub table: TableName,
    pub detail: String,
}

impl std::fmt::Display for UnsupportedChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported change on table {}: {}", self.table, self.detail)
    }
}

/// One atomic schema change, prior to ordering and rendering. Ops reference
/// schema entities by value or by name only; the differ owns them and the
/// planner consumes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum PlanOp {
    CreateTable {
        table: Table,
    },
    DropTable {
        table: TableName,
    },
    CreateIndex {
        index: Index,
    },
    DropIndex {
        name: IndexName,
    },
    AddColumn {
        table: TableName,
        column: Column,
    },
    DropColumn {
        table: TableName,
        column: ColumnName,
    },
    AlterColumnType {
        table: TableName,
        column: ColumnName,
        new_type: String,
        not_null: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        default_expr: Option<String>,
    },
    AddConstraint {
        table: TableName,
        constraint: Constraint,
    },
    DropConstraint {
        table: TableName,
        name: ConstraintName,
    },
    Unsupported {
        change: UnsupportedChange,
    },
}

/// One rendered DDL statement. `destructive` statements are gated behind
/// the `enable_drop` flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlanStatement {
    pub sql: String,
    pub destructive: bool,
}

impl PlanStatement {
    pub fn skipped(&self, enable_drop: bool) -> bool {
        self.destructive && !enable_drop
    }
}

/// The linearized, rendered plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Plan {
    pub statements: Vec<PlanStatement>,
    pub unsupported: Vec<UnsupportedChange>,
    pub violations: Vec<SchemaViolation>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Statements to actually send, honoring the drop gate.
    pub fn executable(&self, enable_drop: bool) -> Vec<String> {
        self.statements
            .iter()
            .filter(|s| !s.skipped(enable_drop))
            .map(|s| s.sql.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(statements: &[(&str, bool)]) -> Plan {
        Plan {
            statements: statements
                .iter()
                .map(|(sql, destructive)| PlanStatement {
                    sql: sql.to_string(),
                    destructive: *destructive,
                })
                .collect(),
            unsupported: vec![],
            violations: vec![],
        }
    }

    #[test]
    fn executable_filters_destructive_statements() {
        let plan = plan(&[
            ("DROP INDEX IdxA", true),
            ("ALTER TABLE T ADD COLUMN C INT64", false),
            ("DROP TABLE T2", true),
        ]);
        assert_eq!(
            plan.executable(false),
            vec!["ALTER TABLE T ADD COLUMN C INT64".to_string()]
        );
        assert_eq!(plan.executable(true).len(), 3);
    }

    #[test]
    fn skipped_depends_on_gate() {
        let stmt = PlanStatement {
            sql: "DROP TABLE T".into(),
            destructive: true,
        };
        assert!(stmt.skipped(false));
        assert!(!stmt.skipped(true));
    }

    #[test]
    fn ops_serialize_with_a_type_tag() {
        let op = PlanOp::DropConstraint {
            table: "Users".into(),
            name: "CK_Users_0".into(),
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["type"], "drop_constraint");
        assert_eq!(json["table"], "Users");
        let back: PlanOp = serde_json::from_value(json).unwrap();
        assert_eq!(back, op);
    }
}
