use std::collections::BTreeSet;

use spannerdiff_core::{PlanOp, Schema, Table, UnsupportedChange, UnsupportedChangeKind};

/// Compares two schemas and produces the unordered op collection that
/// turns `current` into `desired`. Pure and deterministic: name sets are
/// walked lexicographically, so the result does not depend on input
/// statement order.
pub fn diff_schemas(current: &Schema, desired: &Schema) -> Vec<PlanOp> {
    if current == desired {
        return Vec::new();
    }

    let mut ops = Vec::new();

    let table_names: BTreeSet<&str> = current.table_names().chain(desired.table_names()).collect();
    for name in table_names {
        match (current.table(name), desired.table(name)) {
            (None, Some(table)) => ops.push(PlanOp::CreateTable {
                table: table.clone(),
            }),
            (Some(_), None) => ops.push(PlanOp::DropTable {
                table: name.to_string(),
            }),
            (Some(cur), Some(des)) => diff_table(cur, des, &mut ops),
            (None, None) => {}
        }
    }

    let index_names: BTreeSet<&str> = current.index_names().chain(desired.index_names()).collect();
    for name in index_names {
        match (current.index(name), desired.index(name)) {
            (None, Some(index)) => ops.push(PlanOp::CreateIndex {
                index: index.clone(),
            }),
            (Some(_), None) => ops.push(PlanOp::DropIndex {
                name: name.to_string(),
            }),
            (Some(cur), Some(des)) => {
                if desired.table(&cur.table_name).is_none() {
                    // The underlying table is going away; the desired copy
                    // is dangling and surfaces as a schema violation.
                    ops.push(PlanOp::DropIndex {
                        name: name.to_string(),
                    });
                } else if cur != des {
                    // Indexes are never altered in place.
                    ops.push(PlanOp::DropIndex {
                        name: name.to_string(),
                    });
                    ops.push(PlanOp::CreateIndex { index: des.clone() });
                }
            }
            (None, None) => {}
        }
    }

    ops
}

fn diff_table(current: &Table, desired: &Table, ops: &mut Vec<PlanOp>) {
    let table = desired.name.clone();

    let column_names: BTreeSet<&str> = current
        .columns
        .keys()
        .chain(desired.columns.keys())
        .map(String::as_str)
        .collect();
    for name in column_names {
        match (current.columns.get(name), desired.columns.get(name)) {
            (None, Some(column)) => ops.push(PlanOp::AddColumn {
                table: table.clone(),
                column: column.clone(),
            }),
            (Some(_), None) => {
                if current.is_key_column(name) {
                    ops.push(PlanOp::Unsupported {
                        change: UnsupportedChange {
                            kind: UnsupportedChangeKind::KeyColumn,
                            table: table.clone(),
                            detail: format!(
                                "column {name} is part of the primary key and cannot be dropped"
                            ),
                        },
                    });
                } else {
                    ops.push(PlanOp::DropColumn {
                        table: table.clone(),
                        column: name.to_string(),
                    });
                }
            }
            (Some(cur), Some(des)) if cur.differs_from(des) => {
                if current.is_key_column(name) || desired.is_key_column(name) {
                    // Spanner rejects ALTER COLUMN on key columns.
                    ops.push(PlanOp::Unsupported {
                        change: UnsupportedChange {
                            kind: UnsupportedChangeKind::KeyColumn,
                            table: table.clone(),
                            detail: format!(
                                "column {name} is part of the primary key and cannot be altered"
                            ),
                        },
                    });
                } else {
                    ops.push(PlanOp::AlterColumnType {
                        table: table.clone(),
                        column: name.to_string(),
                        new_type: des.r#type.clone(),
                        not_null: des.not_null,
                        default_expr: des.default_expr.clone(),
                    });
                }
            }
            _ => {}
        }
    }

    let constraint_names: BTreeSet<&str> = current
        .constraints
        .keys()
        .chain(desired.constraints.keys())
        .map(String::as_str)
        .collect();
    for name in constraint_names {
        match (current.constraints.get(name), desired.constraints.get(name)) {
            (None, Some(constraint)) => ops.push(PlanOp::AddConstraint {
                table: table.clone(),
                constraint: constraint.clone(),
            }),
            (Some(_), None) => ops.push(PlanOp::DropConstraint {
                table: table.clone(),
                name: name.to_string(),
            }),
            (Some(cur), Some(des)) if cur != des => {
                // Constraints are recreated, never altered.
                ops.push(PlanOp::DropConstraint {
                    table: table.clone(),
                    name: name.to_string(),
                });
                ops.push(PlanOp::AddConstraint {
                    table: table.clone(),
                    constraint: des.clone(),
                });
            }
            _ => {}
        }
    }

    if current.primary_key != desired.primary_key {
        ops.push(unsupported(
            UnsupportedChangeKind::PrimaryKey,
            &table,
            "the primary key cannot be changed in place",
        ));
    }
    if current.parent_table != desired.parent_table {
        ops.push(unsupported(
            UnsupportedChangeKind::Interleave,
            &table,
            "the interleave parent cannot be changed in place",
        ));
    } else if current.on_delete != desired.on_delete {
        ops.push(unsupported(
            UnsupportedChangeKind::OnDelete,
            &table,
            "the interleave ON DELETE action cannot be changed in place",
        ));
    }
    if current.row_deletion_policy != desired.row_deletion_policy {
        ops.push(unsupported(
            UnsupportedChangeKind::RowDeletionPolicy,
            &table,
            "the row deletion policy cannot be changed in place",
        ));
    }
}

fn unsupported(kind: UnsupportedChangeKind, table: &str, detail: &str) -> PlanOp {
    PlanOp::Unsupported {
        change: UnsupportedChange {
            kind,
            table: table.to_string(),
            detail: detail.to_string(),
        },
    }
}
