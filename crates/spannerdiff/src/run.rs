use spannerdiff_catalog::{Catalog, CatalogError};
use spannerdiff_config::FilterConfig;
use spannerdiff_core::{Plan, SchemaViolation, UnsupportedChange};
use spannerdiff_parser::{ParseError, parse_schema};
use spannerdiff_planner::{PlannerError, plan_changes};
use thiserror::Error;

use crate::cancel::CancelToken;
use crate::filter::filter_schema;

/// Which DDL text failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DdlSource {
    Current,
    Desired,
}

impl std::fmt::Display for DdlSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DdlSource::Current => write!(f, "current"),
            DdlSource::Desired => write!(f, "desired"),
        }
    }
}

/// Which catalog call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOp {
    Dump,
    Apply,
}

impl std::fmt::Display for CatalogOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogOp::Dump => write!(f, "dump"),
            CatalogOp::Apply => write!(f, "apply"),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to parse {source_kind} DDLs: {error}")]
    Parse {
        source_kind: DdlSource,
        error: ParseError,
    },
    #[error(transparent)]
    Plan(#[from] PlannerError),
    #[error("refusing to plan {} unsupported change(s)", changes.len())]
    Unsupported { changes: Vec<UnsupportedChange> },
    #[error("{op} failed: {cause}")]
    Catalog { op: CatalogOp, cause: CatalogError },
    #[error("operation cancelled")]
    Cancelled,
}

/// Orchestrator input.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub desired_ddls: String,
    pub dry_run: bool,
    pub export: bool,
    pub enable_drop: bool,
    pub strict: bool,
    pub filter: FilterConfig,
}

#[derive(Debug)]
pub enum RunOutcome {
    /// `--export`: the current schema dump, verbatim.
    Exported { ddl: String },
    /// Nothing to do; the plan may still carry warnings.
    NoChange { plan: Plan },
    DryRun { plan: Plan },
    Applied { plan: Plan },
}

/// Parses both sides, filters, diffs, and linearizes. Never touches a
/// catalog; `run` layers the catalog calls on top.
pub fn generate_ddls(
    desired_ddls: &str,
    current_ddls: &str,
    filter: &FilterConfig,
) -> Result<Plan, RunError> {
    let current = parse_schema(current_ddls).map_err(|error| RunError::Parse {
        source_kind: DdlSource::Current,
        error,
    })?;
    let desired = parse_schema(desired_ddls).map_err(|error| RunError::Parse {
        source_kind: DdlSource::Desired,
        error,
    })?;

    let current = filter_schema(&current, filter);
    let desired = filter_schema(&desired, filter);

    let mut plan = plan_changes(&current, &desired)?;

    let mut violations: Vec<SchemaViolation> = Vec::new();
    for violation in current.validate().into_iter().chain(desired.validate()) {
        if !violations.contains(&violation) {
            violations.push(violation);
        }
    }
    plan.violations = violations;

    Ok(plan)
}

/// The full reconcile flow: dump current, compute the plan, and either
/// report it (dry run) or submit it as one batch. All parser work finishes
/// before diffing; the plan is fully materialized before any execution.
pub fn run(
    catalog: &mut dyn Catalog,
    options: &Options,
    cancel: &CancelToken,
) -> Result<RunOutcome, RunError> {
    if cancel.is_cancelled() {
        return Err(RunError::Cancelled);
    }

    let current_ddls = match catalog.dump() {
        Ok(ddl) => ddl,
        // A database that does not exist yet exports as an empty schema,
        // which permits bootstrapping.
        Err(CatalogError::DatabaseNotFound(_)) if options.export => String::new(),
        Err(cause) => {
            return Err(RunError::Catalog {
                op: CatalogOp::Dump,
                cause,
            });
        }
    };

    if options.export {
        return Ok(RunOutcome::Exported { ddl: current_ddls });
    }

    let plan = generate_ddls(&options.desired_ddls, &current_ddls, &options.filter)?;

    if options.strict && !plan.unsupported.is_empty() {
        return Err(RunError::Unsupported {
            changes: plan.unsupported,
        });
    }
    if plan.is_empty() {
        return Ok(RunOutcome::NoChange { plan });
    }
    if options.dry_run {
        return Ok(RunOutcome::DryRun { plan });
    }

    if cancel.is_cancelled() {
        return Err(RunError::Cancelled);
    }
    let batch = plan.executable(options.enable_drop);
    catalog.apply(&batch).map_err(|cause| RunError::Catalog {
        op: CatalogOp::Apply,
        cause,
    })?;
    Ok(RunOutcome::Applied { plan })
}
