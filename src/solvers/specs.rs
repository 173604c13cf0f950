use crate::smti::{Matching, ObjectiveKind};
use anyhow::Result;

/// The outcome of a solving request.
#[derive(Debug, PartialEq, Eq)]
pub enum MatchingOutcome {
    /// A stable matching proven optimal for the requested objective.
    Optimal(Matching),
    /// A stable matching found without a proof of optimality, the backend
    /// having given up before the end of the search.
    Feasible(Matching),
    /// The backend proved that no stable matching of the requested kind
    /// exists.
    ///
    /// A well-formed instance always admits a stable matching; this outcome
    /// denotes an internal modeling defect, not a property of the input.
    Infeasible,
    /// The backend exhausted its budget without an answer.
    ///
    /// This is distinct from [MatchingOutcome::Infeasible]: nothing is known
    /// about the instance.
    Aborted,
}

impl MatchingOutcome {
    /// Returns the underlying matching, if any.
    pub fn matching(&self) -> Option<&Matching> {
        match self {
            MatchingOutcome::Optimal(m) | MatchingOutcome::Feasible(m) => Some(m),
            MatchingOutcome::Infeasible | MatchingOutcome::Aborted => None,
        }
    }
}

/// A trait for solvers able to compute a stable matching optimizing an
/// objective.
pub trait OptimalMatchingComputer {
    /// Computes a stable matching optimizing the given objective.
    ///
    /// An error is returned when the underlying model cannot be built, which
    /// happens on instances with no man or no woman.
    fn compute_optimal_matching(&mut self, objective: ObjectiveKind) -> Result<MatchingOutcome>;
}
