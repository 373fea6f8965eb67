//! Replays DDL batches onto an in-memory schema, enforcing the same
//! structural rules the database would: no dangling references, no
//! dropping a table that still has indexes, children, or inbound foreign
//! keys.

use spannerdiff_core::Schema;
use spannerdiff_parser::{AlterTableOp, Statement, parse_statements};

use crate::CatalogError;

pub fn apply_ddls(schema: &mut Schema, ddls: &[String]) -> Result<(), CatalogError> {
    for ddl in ddls {
        for stmt in parse_statements(ddl)? {
            apply_statement(schema, stmt)?;
        }
    }
    Ok(())
}

fn apply_statement(schema: &mut Schema, stmt: Statement) -> Result<(), CatalogError> {
    match stmt {
        Statement::CreateTable(table) => {
            if schema.table(&table.name).is_some() {
                return Err(CatalogError::Apply(format!(
                    "table {} already exists",
                    table.name
                )));
            }
            if let Some(parent) = &table.parent_table
                && schema.table(parent).is_none()
            {
                return Err(CatalogError::Apply(format!(
                    "parent table {parent} does not exist"
                )));
            }
            schema.insert_table(table);
            Ok(())
        }
        Statement::CreateIndex(index) => {
            if schema.index(&index.name).is_some() {
                return Err(CatalogError::Apply(format!(
                    "index {} already exists",
                    index.name
                )));
            }
            let Some(table) = schema.table(&index.table_name) else {
                return Err(CatalogError::Apply(format!(
                    "table {} does not exist",
                    index.table_name
                )));
            };
            for column in index.columns.iter().chain(&index.storing) {
                if !table.columns.contains_key(column) {
                    return Err(CatalogError::Apply(format!(
                        "column {column} does not exist in table {}",
                        table.name
                    )));
                }
            }
            schema.insert_index(index);
            Ok(())
        }
        Statement::DropTable { table } => {
            if schema.table(&table).is_none() {
                return Err(CatalogError::Apply(format!("table {table} does not exist")));
            }
            if let Some(index) = schema.indexes_on(&table).next() {
                return Err(CatalogError::Apply(format!(
                    "table {table} still has index {}",
                    index.name
                )));
            }
            if let Some(child) = schema.children_of(&table).next() {
                return Err(CatalogError::Apply(format!(
                    "table {table} still has interleaved child {}",
                    child.name
                )));
            }
            let inbound = schema.tables().find(|other| {
                other.name != table
                    && other
                        .constraints
                        .values()
                        .any(|c| c.referenced_table() == Some(table.as_str()))
            });
            if let Some(other) = inbound {
                return Err(CatalogError::Apply(format!(
                    "table {table} is referenced by a foreign key on {}",
                    other.name
                )));
            }
            schema.remove_table(&table);
            Ok(())
        }
        Statement::DropIndex { name } => {
            if schema.remove_index(&name).is_none() {
                return Err(CatalogError::Apply(format!("index {name} does not exist")));
            }
            Ok(())
        }
        Statement::AlterTable { table, op } => {
            let Some(t) = schema.table_mut(&table) else {
                return Err(CatalogError::Apply(format!("table {table} does not exist")));
            };
            match op {
                AlterTableOp::AddColumn(mut column) => {
                    if t.columns.contains_key(&column.name) {
                        return Err(CatalogError::Apply(format!(
                            "column {} already exists in table {table}",
                            column.name
                        )));
                    }
                    column.order = t.next_column_order();
                    t.columns.insert(column.name.clone(), column);
                }
                AlterTableOp::DropColumn(column) => {
                    if t.is_key_column(&column) {
                        return Err(CatalogError::Apply(format!(
                            "column {column} is part of the primary key of {table}"
                        )));
                    }
                    if t.columns.remove(&column).is_none() {
                        return Err(CatalogError::Apply(format!(
                            "column {column} does not exist in table {table}"
                        )));
                    }
                }
                AlterTableOp::AlterColumn {
                    column,
                    new_type,
                    not_null,
                    default_expr,
                } => {
                    let Some(c) = t.columns.get_mut(&column) else {
                        return Err(CatalogError::Apply(format!(
                            "column {column} does not exist in table {table}"
                        )));
                    };
                    c.r#type = new_type;
                    c.not_null = not_null;
                    c.default_expr = default_expr;
                }
                AlterTableOp::AddConstraint(constraint) => {
                    let name = constraint.name().to_string();
                    if t.constraints.contains_key(&name) {
                        return Err(CatalogError::Apply(format!(
                            "constraint {name} already exists on table {table}"
                        )));
                    }
                    t.constraints.insert(name, constraint);
                }
                AlterTableOp::DropConstraint(name) => {
                    if t.constraints.remove(&name).is_none() {
                        return Err(CatalogError::Apply(format!(
                            "constraint {name} does not exist on table {table}"
                        )));
                    }
                }
            }
            Ok(())
        }
        Statement::Ignored => Err(CatalogError::Apply(
            "statement is outside the supported DDL subset".to_string(),
        )),
    }
}
