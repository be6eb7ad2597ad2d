use std::fmt::Debug;

/// Coarse classification of a [`SortError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    CycleDetected,
    ContractViolation,
}

/// Ways the edge lookup can break its contract with the sorter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation<T: Debug> {
    #[error("edges from node {0:?} is absent in the provided graph")]
    MissingEdges(T),
    #[error("node {from:?} has an edge to {to:?} which is not in the node set")]
    UnknownNode { from: T, to: T },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortError<T: Debug> {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// `node` was reached while still in progress. `cycle` is the dependency
    /// path starting at `node` whose last element points back to it.
    #[error("cyclic dependency detected, {node:?} already visited")]
    CycleDetected { node: T, cycle: Vec<T> },
    #[error("contract violation: {0}")]
    ContractViolation(Violation<T>),
}

impl<T: Debug> SortError<T> {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SortError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            SortError::CycleDetected { .. } => ErrorKind::CycleDetected,
            SortError::ContractViolation(_) => ErrorKind::ContractViolation,
        }
    }
}

impl<T: Debug> From<Violation<T>> for SortError<T> {
    fn from(v: Violation<T>) -> Self {
        SortError::ContractViolation(v)
    }
}
