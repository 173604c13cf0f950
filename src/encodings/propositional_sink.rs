use super::{ModelLiteral, ModelSink, ObjectiveDirection, Relation, VarHandle};
use crate::sat::{Literal, SatSolver, Variable};

/// A sink turning the generic constraint emission into clauses for a SAT solver.
///
/// The pseudo-Boolean shapes produced by the builders are lowered on the fly:
/// a sum of variables at least 1 becomes a single clause, a sum of variables
/// at most 1 becomes the pairwise at-most-one clauses.
/// Domain variables and objectives are not expressible here; the propositional
/// pipelines evaluate objectives on decoded matchings instead.
pub struct PropositionalSink<'a> {
    solver: &'a mut dyn SatSolver,
    n_vars: usize,
}

impl<'a> PropositionalSink<'a> {
    /// Builds a new sink over a SAT solver.
    pub fn new(solver: &'a mut dyn SatSolver) -> Self {
        Self { solver, n_vars: 0 }
    }

    /// Returns the SAT variable associated with a sink handle.
    ///
    /// Handles are mapped in declaration order onto the variables 1, 2, ...
    pub fn solver_variable(handle: VarHandle) -> Variable {
        Variable::from(handle.index() + 1)
    }

    fn literal(literal: &ModelLiteral) -> Literal {
        let var = handle_to_dimacs(literal.var());
        if literal.is_positive() {
            Literal::from(var)
        } else {
            Literal::from(-var)
        }
    }
}

fn handle_to_dimacs(handle: VarHandle) -> isize {
    (handle.index() + 1) as isize
}

impl ModelSink for PropositionalSink<'_> {
    fn new_binary_variable(&mut self, _name: String) -> VarHandle {
        let handle = VarHandle(self.n_vars);
        self.n_vars += 1;
        self.solver.reserve(self.n_vars);
        handle
    }

    fn new_domain_variable(&mut self, name: String, _lb: i64, _ub: i64) -> VarHandle {
        panic!(
            r#"cannot declare the domain variable "{}" in a propositional sink"#,
            name
        )
    }

    fn add_linear_constraint(&mut self, terms: &[(i64, VarHandle)], relation: Relation, bound: i64) {
        if terms.iter().any(|(coefficient, _)| *coefficient != 1) {
            panic!("only unit coefficients can be lowered to clauses");
        }
        match (relation, bound) {
            (Relation::GreaterOrEqual, 1) => {
                let clause = terms
                    .iter()
                    .map(|(_, v)| Literal::from(handle_to_dimacs(*v)))
                    .collect();
                self.solver.add_clause(clause);
            }
            (Relation::LessOrEqual, 1) => {
                for (index, (_, first)) in terms.iter().enumerate() {
                    for (_, second) in &terms[1 + index..] {
                        self.solver.add_clause(vec![
                            Literal::from(-handle_to_dimacs(*first)),
                            Literal::from(-handle_to_dimacs(*second)),
                        ]);
                    }
                }
            }
            _ => panic!(
                "cannot lower a linear constraint with relation {} and bound {} to clauses",
                relation, bound
            ),
        }
    }

    fn add_clause(&mut self, literals: &[ModelLiteral]) {
        self.solver
            .add_clause(literals.iter().map(Self::literal).collect());
    }

    fn set_objective(&mut self, _terms: &[(i64, VarHandle)], _direction: ObjectiveDirection) {
        panic!("a propositional sink cannot carry an objective expression")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::{default_solver, SatSolver, SolvingResult};

    #[test]
    fn test_at_least_one_becomes_a_clause() {
        let mut solver = default_solver();
        let mut sink = PropositionalSink::new(solver.as_mut());
        let x = sink.new_binary_variable("x".to_string());
        let y = sink.new_binary_variable("y".to_string());
        sink.add_linear_constraint(&[(1, x), (1, y)], Relation::GreaterOrEqual, 1);
        sink.add_clause(&[ModelLiteral::negative(x)]);
        sink.add_clause(&[ModelLiteral::negative(y)]);
        assert_eq!(SolvingResult::Unsatisfiable, solver.solve());
    }

    #[test]
    fn test_at_most_one_becomes_pairwise_clauses() {
        let mut solver = default_solver();
        let mut sink = PropositionalSink::new(solver.as_mut());
        let x = sink.new_binary_variable("x".to_string());
        let y = sink.new_binary_variable("y".to_string());
        sink.add_linear_constraint(&[(1, x), (1, y)], Relation::LessOrEqual, 1);
        sink.add_clause(&[ModelLiteral::positive(x)]);
        sink.add_clause(&[ModelLiteral::positive(y)]);
        assert_eq!(SolvingResult::Unsatisfiable, solver.solve());
    }

    #[test]
    fn test_solver_variable_mapping() {
        let mut solver = default_solver();
        let mut sink = PropositionalSink::new(solver.as_mut());
        let x = sink.new_binary_variable("x".to_string());
        let y = sink.new_binary_variable("y".to_string());
        assert_eq!(1, usize::from(PropositionalSink::solver_variable(x)));
        assert_eq!(2, usize::from(PropositionalSink::solver_variable(y)));
    }

    #[test]
    #[should_panic(expected = "domain variable")]
    fn test_domain_variable_is_rejected() {
        let mut solver = default_solver();
        let mut sink = PropositionalSink::new(solver.as_mut());
        sink.new_domain_variable("z".to_string(), 0, 1);
    }

    #[test]
    #[should_panic(expected = "objective")]
    fn test_objective_is_rejected() {
        let mut solver = default_solver();
        let mut sink = PropositionalSink::new(solver.as_mut());
        let x = sink.new_binary_variable("x".to_string());
        sink.set_objective(&[(1, x)], ObjectiveDirection::Maximize);
    }
}
