use spannerdiff_core::{Column, ColumnName, Constraint, ConstraintName, Index, Table, TableName};

/// A parsed DDL statement. Schema construction only consumes the two
/// `Create*` variants; the rest exist so a catalog can replay generated
/// batches onto an in-memory schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    CreateTable(Table),
    CreateIndex(Index),
    AlterTable {
        table: TableName,
        op: AlterTableOp,
    },
    DropTable {
        table: TableName,
    },
    DropIndex {
        name: String,
    },
    /// A statement outside the supported subset, skipped for forward
    /// compatibility with dumps that contain newer constructs.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterTableOp {
    AddColumn(Column),
    DropColumn(ColumnName),
    AlterColumn {
        column: ColumnName,
        new_type: String,
        not_null: bool,
        default_expr: Option<String>,
    },
    AddConstraint(Constraint),
    DropConstraint(ConstraintName),
}
