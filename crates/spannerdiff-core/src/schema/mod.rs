pub mod column;
pub mod constraint;
pub mod index;
pub mod names;
pub mod schema;
pub mod table;

pub use column::Column;
pub use constraint::{Constraint, ReferenceAction};
pub use index::Index;
pub use names::{ColumnName, ConstraintName, IndexName, TableName};
pub use schema::{Schema, SchemaViolation};
pub use table::{RowDeletionPolicy, Table};
