//! Solving pipelines computing stable matchings from encoded instances.

mod sat_stable_matching_solver;
pub use sat_stable_matching_solver::SatStableMatchingSolver;

mod specs;
pub use specs::MatchingOutcome;
pub use specs::OptimalMatchingComputer;
