use super::{
    sat_solver::{SolvingListener, SolvingResult},
    Assignment, Literal, SatSolver,
};
use cadical::Solver as CadicalCSolver;

/// A wrapper around the Cadical SAT solver.
#[derive(Default)]
pub struct CadicalSolver {
    solver: CadicalCSolver,
    n_reserved: usize,
    n_clauses: usize,
    listeners: Vec<Box<dyn SolvingListener>>,
}

impl SatSolver for CadicalSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        self.n_clauses += 1;
        self.solver
            .add_clause(cl.into_iter().map(|l| isize::from(l) as i32))
    }

    fn solve(&mut self) -> SolvingResult {
        self.listeners
            .iter()
            .for_each(|l| l.solving_start(self.n_vars(), self.n_clauses));
        let result = match self.solver.solve() {
            Some(true) => {
                let assignment = Assignment::new(
                    (1..=self.n_vars() as i32)
                        .map(|i| {
                            if i <= self.solver.max_variable() {
                                self.solver.value(i)
                            } else {
                                None
                            }
                        })
                        .collect(),
                );
                SolvingResult::Satisfiable(assignment)
            }
            Some(false) => SolvingResult::Unsatisfiable,
            None => SolvingResult::Unknown,
        };
        self.listeners.iter().for_each(|l| l.solving_end(&result));
        result
    }

    fn n_vars(&self) -> usize {
        usize::max(self.n_reserved, self.solver.max_variable() as usize)
    }

    fn reserve(&mut self, new_max_id: usize) {
        if new_max_id > self.n_reserved {
            self.n_reserved = new_max_id;
        }
    }

    fn add_listener(&mut self, listener: Box<dyn SolvingListener>) {
        self.listeners.push(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::clause;

    #[test]
    fn test_sat() {
        let mut s = CadicalSolver::default();
        s.add_clause(clause![-1, 2]);
        let assignment = s.solve().unwrap_model().unwrap();
        assert!(assignment.value_of(1) == Some(false) || assignment.value_of(2) == Some(true))
    }

    #[test]
    fn test_unsat() {
        let mut s = CadicalSolver::default();
        s.add_clause(clause![-1, 2]);
        s.add_clause(clause![-1, -2]);
        s.add_clause(clause![1]);
        assert!(s.solve().unwrap_model().is_none());
    }

    #[test]
    fn test_iterative() {
        let mut s = CadicalSolver::default();
        s.add_clause(clause![-1, 2]);
        let assignment_1 = s.solve().unwrap_model().unwrap();
        assert!(assignment_1.value_of(1) == Some(false) || assignment_1.value_of(2) == Some(true));
        s.add_clause(clause![1, 3]);
        s.add_clause(clause![-2, 3]);
        let assignment_2 = s.solve().unwrap_model().unwrap();
        assert!(assignment_2.value_of(1) == Some(false) || assignment_2.value_of(2) == Some(true));
        assert!(assignment_2.value_of(3) == Some(true));
        s.add_clause(clause![-3]);
        assert!(s.solve().unwrap_model().is_none());
    }

    #[test]
    fn test_reserve_covers_unconstrained_vars() {
        let mut s = CadicalSolver::default();
        s.reserve(3);
        s.add_clause(clause![1]);
        assert_eq!(3, s.n_vars());
        let assignment = s.solve().unwrap_model().unwrap();
        assert_eq!(Some(true), assignment.value_of(1));
        assert_eq!(None, assignment.value_of(3));
    }
}
