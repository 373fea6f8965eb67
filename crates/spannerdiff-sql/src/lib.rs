pub mod alter_table;
pub mod create_index;
pub mod create_table;
pub mod drop;
pub mod dump;
pub mod helpers;

pub use alter_table::{
    render_add_column, render_add_constraint, render_alter_column, render_drop_column,
    render_drop_constraint,
};
pub use create_index::render_create_index;
pub use create_table::render_create_table;
pub use drop::{render_drop_index, render_drop_table};
pub use dump::render_schema;

use spannerdiff_core::PlanOp;

/// Renders one plan op into a single DDL statement, without a trailing
/// semicolon. Unsupported-change ops carry no statement.
pub fn render_op(op: &PlanOp) -> Option<String> {
    match op {
        PlanOp::CreateTable { table } => Some(render_create_table(table)),
        PlanOp::DropTable { table } => Some(render_drop_table(table)),
        PlanOp::CreateIndex { index } => Some(render_create_index(index)),
        PlanOp::DropIndex { name } => Some(render_drop_index(name)),
        PlanOp::AddColumn { table, column } => Some(render_add_column(table, column)),
        PlanOp::DropColumn { table, column } => Some(render_drop_column(table, column)),
        PlanOp::AlterColumnType {
            table,
            column,
            new_type,
            not_null,
            default_expr,
        } => Some(render_alter_column(
            table,
            column,
            new_type,
            *not_null,
            default_expr.as_deref(),
        )),
        PlanOp::AddConstraint { table, constraint } => {
            Some(render_add_constraint(table, constraint))
        }
        PlanOp::DropConstraint { table, name } => Some(render_drop_constraint(table, name)),
        PlanOp::Unsupported { .. } => None,
    }
}
