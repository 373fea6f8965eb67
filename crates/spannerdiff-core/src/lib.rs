pub mod op;
pub mod schema;

pub use op::{Plan, PlanOp, PlanStatement, UnsupportedChange, UnsupportedChangeKind};
pub use schema::{
    Column, ColumnName, Constraint, ConstraintName, Index, IndexName, ReferenceAction,
    RowDeletionPolicy, Schema, SchemaViolation, Table, TableName,
};
