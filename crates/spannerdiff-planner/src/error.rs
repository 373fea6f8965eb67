use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    #[error("cyclic dependency between tables: {}", names.join(", "))]
    CyclicDependency { names: Vec<String> },
}
