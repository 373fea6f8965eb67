pub mod diff;
pub mod error;
pub mod order;
pub mod plan;

pub use diff::diff_schemas;
pub use error::PlannerError;
pub use order::dependency_order;
pub use plan::{build_plan, plan_changes};
