pub type TableName = String;
pub type ColumnName = String;
pub type IndexName = String;
pub type ConstraintName = String;
