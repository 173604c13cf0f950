use super::specs::{MatchingOutcome, OptimalMatchingComputer};
use crate::{
    encodings::{
        ConstraintModelBuilder, MatchingVars, PropositionalSink, StabilityEncoder,
        TiePrefixStabilityEncoder,
    },
    sat::{Assignment, DefaultSatSolverFactory, Literal, SatSolver, SatSolverFactory, SolvingResult},
    smti::{Instance, Matching, ObjectiveKind},
};
use anyhow::{anyhow, Result};
use log::info;

/// A SAT-based solver for MAX-SMTI instances.
///
/// The instance is encoded once per request; stable matchings are then
/// obtained by iterated calls to the underlying SAT solver, each found
/// matching being excluded by a blocking clause over the decision variables.
/// Objectives are evaluated on the decoded matchings, making the optimum
/// exact once the enumeration is exhausted.
pub struct SatStableMatchingSolver<'a> {
    instance: &'a Instance,
    solver_factory: Box<dyn SatSolverFactory>,
    stability_encoder: Box<dyn StabilityEncoder>,
}

impl<'a> SatStableMatchingSolver<'a> {
    /// Builds a new solver relying on the default SAT solver and the
    /// tie-prefix stability encoding.
    pub fn new(instance: &'a Instance) -> Self {
        Self::new_with_sat_solver_factory(instance, Box::new(DefaultSatSolverFactory))
    }

    /// Builds a new solver given the factory used to create the underlying
    /// SAT solvers.
    pub fn new_with_sat_solver_factory(
        instance: &'a Instance,
        solver_factory: Box<dyn SatSolverFactory>,
    ) -> Self {
        Self::new_with_sat_solver_factory_and_stability_encoder(
            instance,
            solver_factory,
            Box::new(TiePrefixStabilityEncoder),
        )
    }

    /// Builds a new solver given the SAT solver factory and the stability
    /// encoder to use.
    pub fn new_with_sat_solver_factory_and_stability_encoder(
        instance: &'a Instance,
        solver_factory: Box<dyn SatSolverFactory>,
        stability_encoder: Box<dyn StabilityEncoder>,
    ) -> Self {
        Self {
            instance,
            solver_factory,
            stability_encoder,
        }
    }

    /// Computes a stable matching, with no optimality requirement.
    pub fn compute_one_matching(&mut self) -> Result<MatchingOutcome> {
        let (mut solver, vars) = self.encode()?;
        Ok(match solver.solve() {
            SolvingResult::Satisfiable(assignment) => {
                MatchingOutcome::Feasible(self.decode(&vars, &assignment))
            }
            SolvingResult::Unsatisfiable => MatchingOutcome::Infeasible,
            SolvingResult::Unknown => MatchingOutcome::Aborted,
        })
    }

    /// Enumerates the stable matchings of the instance, feeding them to the
    /// consumer, and returns their count.
    ///
    /// An error is returned if the backend gives up before the enumeration is
    /// complete.
    pub fn enumerate_stable_matchings(
        &mut self,
        consumer: &mut dyn FnMut(&Matching),
    ) -> Result<usize> {
        let (mut solver, vars) = self.encode()?;
        let mut n_found = 0;
        loop {
            match solver.solve() {
                SolvingResult::Satisfiable(assignment) => {
                    let matching = self.decode(&vars, &assignment);
                    n_found += 1;
                    consumer(&matching);
                    solver.add_clause(blocking_clause(&vars, &assignment));
                }
                SolvingResult::Unsatisfiable => return Ok(n_found),
                SolvingResult::Unknown => {
                    return Err(anyhow!(
                        "the SAT backend gave up after {} stable matching(s)",
                        n_found
                    ))
                }
            }
        }
    }

    fn encode(&self) -> Result<(Box<dyn SatSolver>, MatchingVars)> {
        let mut solver = self.solver_factory.new_solver();
        let mut sink = PropositionalSink::new(solver.as_mut());
        let builder = ConstraintModelBuilder::new(self.instance);
        let vars = builder.encode_into(&mut sink, self.stability_encoder.as_ref())?;
        Ok((solver, vars))
    }

    fn decode(&self, vars: &MatchingVars, assignment: &Assignment) -> Matching {
        let pairs = vars
            .iter()
            .filter(|(_, v)| {
                assignment.value_of(PropositionalSink::solver_variable(*v)) == Some(true)
            })
            .map(|(pair, _)| pair)
            .collect::<Vec<(usize, usize)>>();
        let matching = Matching::from_pairs(self.instance, &pairs).unwrap();
        debug_assert!(matching.is_stable(self.instance));
        matching
    }
}

fn blocking_clause(vars: &MatchingVars, assignment: &Assignment) -> Vec<Literal> {
    vars.iter()
        .map(|(_, v)| {
            let dimacs = (v.index() + 1) as isize;
            if assignment.value_of(PropositionalSink::solver_variable(v)) == Some(true) {
                Literal::from(-dimacs)
            } else {
                Literal::from(dimacs)
            }
        })
        .collect()
}

impl OptimalMatchingComputer for SatStableMatchingSolver<'_> {
    fn compute_optimal_matching(&mut self, objective: ObjectiveKind) -> Result<MatchingOutcome> {
        let (mut solver, vars) = self.encode()?;
        let mut best: Option<(Matching, i64)> = None;
        loop {
            match solver.solve() {
                SolvingResult::Satisfiable(assignment) => {
                    let matching = self.decode(&vars, &assignment);
                    let value = objective.value(self.instance, &matching);
                    solver.add_clause(blocking_clause(&vars, &assignment));
                    if best
                        .as_ref()
                        .map(|(_, incumbent)| objective.is_improvement(value, *incumbent))
                        .unwrap_or(true)
                    {
                        best = Some((matching, value));
                    }
                }
                SolvingResult::Unsatisfiable => {
                    return Ok(match best {
                        Some((matching, value)) => {
                            info!(
                                "proven optimal value for objective {}: {}",
                                objective.as_str(),
                                value
                            );
                            MatchingOutcome::Optimal(matching)
                        }
                        None => MatchingOutcome::Infeasible,
                    })
                }
                SolvingResult::Unknown => {
                    return Ok(match best {
                        Some((matching, _)) => MatchingOutcome::Feasible(matching),
                        None => MatchingOutcome::Aborted,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encodings::PairwiseStabilityEncoder;
    use crate::sat::{BufferedSatSolver, SolvingFn};
    use crate::smti::PreferenceList;
    use std::collections::HashSet;

    fn list(groups: Vec<Vec<usize>>) -> PreferenceList {
        PreferenceList::from_groups(groups).unwrap()
    }

    fn trivial_instance() -> Instance {
        Instance::new(vec![list(vec![vec![1]])], vec![list(vec![vec![1]])]).unwrap()
    }

    fn tied_instance() -> Instance {
        let men = vec![list(vec![vec![1]]), list(vec![vec![1]])];
        let women = vec![list(vec![vec![1, 2]]), list(vec![vec![1], vec![2]])];
        Instance::new(men, women).unwrap()
    }

    fn divergent_instance() -> Instance {
        let men = vec![list(vec![vec![1], vec![2]]), list(vec![vec![1, 2]])];
        let women = vec![list(vec![vec![1, 2]]), list(vec![vec![1, 2]])];
        Instance::new(men, women).unwrap()
    }

    #[test]
    fn test_compute_one_matching_trivial() {
        let instance = trivial_instance();
        let mut solver = SatStableMatchingSolver::new(&instance);
        let outcome = solver.compute_one_matching().unwrap();
        let matching = outcome.matching().unwrap();
        assert_eq!(Some(1), matching.partner_of_man(1));
    }

    #[test]
    fn test_empty_instance_is_a_build_error() {
        let instance = Instance::new(vec![], vec![list(vec![])]).unwrap();
        let mut solver = SatStableMatchingSolver::new(&instance);
        assert!(solver.compute_one_matching().is_err());
    }

    #[test]
    fn test_man_with_empty_list_is_always_single() {
        let men = vec![list(vec![]), list(vec![vec![1]])];
        let women = vec![list(vec![vec![1, 2]])];
        let instance = Instance::new(men, women).unwrap();
        let mut solver = SatStableMatchingSolver::new(&instance);
        let mut n = 0;
        solver
            .enumerate_stable_matchings(&mut |matching| {
                n += 1;
                assert_eq!(None, matching.partner_of_man(1));
            })
            .unwrap();
        assert!(n > 0);
    }

    #[test]
    fn test_enumerate_tied_matchings() {
        let instance = tied_instance();
        let mut solver = SatStableMatchingSolver::new(&instance);
        let mut found = HashSet::new();
        let n = solver
            .enumerate_stable_matchings(&mut |matching| {
                assert!(matching.is_stable(&instance));
                found.insert(matching.partner_of_woman(1).unwrap());
            })
            .unwrap();
        assert_eq!(2, n);
        assert_eq!(HashSet::from([1, 2]), found);
    }

    #[test]
    fn test_both_stability_encodings_agree() {
        let instance = divergent_instance();
        let mut matchings_by_encoder = Vec::new();
        for encoder in [
            Box::new(PairwiseStabilityEncoder) as Box<dyn StabilityEncoder>,
            Box::new(TiePrefixStabilityEncoder),
        ] {
            let mut solver = SatStableMatchingSolver::new_with_sat_solver_factory_and_stability_encoder(
                &instance,
                Box::new(DefaultSatSolverFactory),
                encoder,
            );
            let mut found = HashSet::new();
            solver
                .enumerate_stable_matchings(&mut |matching| {
                    found.insert(matching.iter_pairs().collect::<Vec<(usize, usize)>>());
                })
                .unwrap();
            matchings_by_encoder.push(found);
        }
        assert_eq!(matchings_by_encoder[0], matchings_by_encoder[1]);
        assert!(!matchings_by_encoder[0].is_empty());
    }

    #[test]
    fn test_max_cardinality_is_indifferent_between_perfect_matchings() {
        let instance = divergent_instance();
        let mut solver = SatStableMatchingSolver::new(&instance);
        let outcome = solver
            .compute_optimal_matching(ObjectiveKind::MaxCardinality)
            .unwrap();
        match outcome {
            MatchingOutcome::Optimal(matching) => assert_eq!(2, matching.cardinality()),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_egalitarian_selects_the_cheapest_maximum_matching() {
        let instance = divergent_instance();
        let mut solver = SatStableMatchingSolver::new(&instance);
        let outcome = solver
            .compute_optimal_matching(ObjectiveKind::Egalitarian)
            .unwrap();
        match outcome {
            MatchingOutcome::Optimal(matching) => {
                assert_eq!(Some(1), matching.partner_of_man(1));
                assert_eq!(Some(2), matching.partner_of_man(2));
                assert_eq!(4, ObjectiveKind::Egalitarian.value(&instance, &matching));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_sex_equal_on_tied_instance() {
        let instance = tied_instance();
        let mut solver = SatStableMatchingSolver::new(&instance);
        let outcome = solver
            .compute_optimal_matching(ObjectiveKind::SexEqual)
            .unwrap();
        match outcome {
            MatchingOutcome::Optimal(matching) => {
                assert_eq!(0, ObjectiveKind::SexEqual.value(&instance, &matching));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    fn give_up_solving_fn() -> Box<SolvingFn> {
        Box::new(|_| Box::new("".as_bytes()))
    }

    struct GiveUpFactory;

    impl SatSolverFactory for GiveUpFactory {
        fn new_solver(&self) -> Box<dyn SatSolver> {
            Box::new(BufferedSatSolver::new(give_up_solving_fn()))
        }
    }

    #[test]
    fn test_backend_giving_up_yields_aborted() {
        let instance = trivial_instance();
        let mut solver =
            SatStableMatchingSolver::new_with_sat_solver_factory(&instance, Box::new(GiveUpFactory));
        assert_eq!(
            MatchingOutcome::Aborted,
            solver
                .compute_optimal_matching(ObjectiveKind::MaxCardinality)
                .unwrap()
        );
        assert!(solver.enumerate_stable_matchings(&mut |_| {}).is_err());
    }
}
