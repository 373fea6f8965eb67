use std::collections::{BTreeMap, BTreeSet};

use spannerdiff_core::{
    Column, Constraint, Index, Plan, PlanOp, PlanStatement, Schema, Table, UnsupportedChange,
};
use spannerdiff_sql::{
    render_add_column, render_add_constraint, render_alter_column, render_create_index,
    render_create_table, render_drop_column, render_drop_constraint, render_drop_index,
    render_drop_table,
};

use crate::diff::diff_schemas;
use crate::error::PlannerError;
use crate::order::dependency_order;

/// Diffs two schemas and linearizes the result into executable DDL.
pub fn plan_changes(current: &Schema, desired: &Schema) -> Result<Plan, PlannerError> {
    build_plan(diff_schemas(current, desired), current)
}

#[derive(Default)]
struct TableAlters {
    add_columns: Vec<Column>,
    alter_columns: Vec<(String, String, bool, Option<String>)>,
    drop_columns: Vec<String>,
    add_constraints: Vec<Constraint>,
}

/// Orders an op collection into strict phases: index drops, constraint
/// drops, table drops (children first), table alters, table creates
/// (parents first), index creates. Dependency edges for drops come from
/// the current schema; edges for creates travel inside the ops, which
/// carry the desired table definitions.
pub fn build_plan(ops: Vec<PlanOp>, current: &Schema) -> Result<Plan, PlannerError> {
    let mut drop_indexes: Vec<String> = Vec::new();
    let mut drop_constraints: Vec<(String, String)> = Vec::new();
    let mut drop_tables: Vec<String> = Vec::new();
    let mut alters: BTreeMap<String, TableAlters> = BTreeMap::new();
    let mut create_tables: Vec<Table> = Vec::new();
    let mut create_indexes: Vec<Index> = Vec::new();
    let mut unsupported: Vec<UnsupportedChange> = Vec::new();

    for op in ops {
        match op {
            PlanOp::CreateTable { table } => create_tables.push(table),
            PlanOp::DropTable { table } => drop_tables.push(table),
            PlanOp::CreateIndex { index } => create_indexes.push(index),
            PlanOp::DropIndex { name } => drop_indexes.push(name),
            PlanOp::AddColumn { table, column } => {
                alters.entry(table).or_default().add_columns.push(column);
            }
            PlanOp::DropColumn { table, column } => {
                alters.entry(table).or_default().drop_columns.push(column);
            }
            PlanOp::AlterColumnType {
                table,
                column,
                new_type,
                not_null,
                default_expr,
            } => {
                alters
                    .entry(table)
                    .or_default()
                    .alter_columns
                    .push((column, new_type, not_null, default_expr));
            }
            PlanOp::AddConstraint { table, constraint } => {
                alters
                    .entry(table)
                    .or_default()
                    .add_constraints
                    .push(constraint);
            }
            PlanOp::DropConstraint { table, name } => drop_constraints.push((table, name)),
            PlanOp::Unsupported { change } => unsupported.push(change),
        }
    }

    let dropped: BTreeSet<&str> = drop_tables.iter().map(String::as_str).collect();
    let mut statements: Vec<PlanStatement> = Vec::new();

    // Phase 1: drop indexes, those on vanishing tables first.
    drop_indexes.sort();
    let (on_dropped_tables, rest): (Vec<&String>, Vec<&String>) =
        drop_indexes.iter().partition(|name| {
            current
                .index(name)
                .is_some_and(|index| dropped.contains(index.table_name.as_str()))
        });
    for name in on_dropped_tables.into_iter().chain(rest) {
        statements.push(destructive(render_drop_index(name)));
    }

    // Phase 2: drop constraints; foreign keys into vanishing tables first.
    drop_constraints.sort();
    let points_at_dropped = |table: &str, name: &str| {
        current
            .table(table)
            .and_then(|t| t.constraints.get(name))
            .and_then(Constraint::referenced_table)
            .is_some_and(|target| dropped.contains(target))
    };
    let (into_dropped, rest): (Vec<&(String, String)>, Vec<&(String, String)>) = drop_constraints
        .iter()
        .partition(|(table, name)| points_at_dropped(table, name));
    for (table, name) in into_dropped.into_iter().chain(rest) {
        statements.push(destructive(render_drop_constraint(table, name)));
    }

    // Phase 3: drop tables, children and referencers before their targets.
    let to_drop: Vec<&Table> = drop_tables
        .iter()
        .filter_map(|name| current.table(name))
        .collect();
    let mut drop_order = dependency_order(&to_drop)?;
    drop_order.reverse();
    for table in drop_order {
        statements.push(destructive(render_drop_table(&table.name)));
    }

    // Phase 4: alter surviving tables, alphabetically.
    for (table, mut alter) in alters {
        alter
            .add_columns
            .sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        for column in &alter.add_columns {
            statements.push(plain(render_add_column(&table, column)));
        }

        alter.alter_columns.sort();
        for (column, new_type, not_null, default_expr) in &alter.alter_columns {
            statements.push(plain(render_alter_column(
                &table,
                column,
                new_type,
                *not_null,
                default_expr.as_deref(),
            )));
        }

        alter.drop_columns.sort();
        for column in &alter.drop_columns {
            statements.push(destructive(render_drop_column(&table, column)));
        }

        alter
            .add_constraints
            .sort_by(|a, b| a.name().cmp(b.name()));
        for constraint in &alter.add_constraints {
            statements.push(plain(render_add_constraint(&table, constraint)));
        }
    }

    // Phase 5: create tables, parents and referenced tables first.
    let to_create: Vec<&Table> = create_tables.iter().collect();
    for table in dependency_order(&to_create)? {
        statements.push(plain(render_create_table(table)));
    }

    // Phase 6: create indexes.
    create_indexes.sort_by(|a, b| a.name.cmp(&b.name));
    for index in &create_indexes {
        statements.push(plain(render_create_index(index)));
    }

    Ok(Plan {
        statements,
        unsupported,
        violations: Vec::new(),
    })
}

fn plain(sql: String) -> PlanStatement {
    PlanStatement {
        sql,
        destructive: false,
    }
}

fn destructive(sql: String) -> PlanStatement {
    PlanStatement {
        sql,
        destructive: true,
    }
}
