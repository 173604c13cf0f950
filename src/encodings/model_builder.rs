use super::{MatchingVars, ModelSink, Relation, StabilityEncoder, VarHandle};
use crate::smti::{EmptyInstanceError, Instance};
use log::debug;

/// The builder of the constraint set shared by every backend.
///
/// Given an instance, the builder declares one decision variable per
/// acceptable pair, states that each agent is matched at most once, and
/// delegates the stability requirement to a pluggable [`StabilityEncoder`].
/// Pairs unacceptable on at least one side get no variable, which eliminates
/// them from the model up front.
pub struct ConstraintModelBuilder<'a> {
    instance: &'a Instance,
}

impl<'a> ConstraintModelBuilder<'a> {
    /// Builds a new builder over an instance.
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// Emits the generic constraint set into the sink and returns the
    /// registry of the declared matching variables.
    ///
    /// An error is returned when the instance has no man or no woman; the
    /// absence of a stable matching of the requested kind is never a build
    /// failure.
    pub fn encode_into(
        &self,
        sink: &mut dyn ModelSink,
        stability: &dyn StabilityEncoder,
    ) -> Result<MatchingVars, EmptyInstanceError> {
        if self.instance.n_men() == 0 {
            return Err(EmptyInstanceError("men"));
        }
        if self.instance.n_women() == 0 {
            return Err(EmptyInstanceError("women"));
        }
        let vars = MatchingVars::declare(self.instance, sink);
        debug!(
            "declared {} matching variable(s); {} pair(s) eliminated as unacceptable",
            vars.len(),
            self.instance.mutually_unacceptable_pairs().count()
        );
        self.encode_one_to_one(sink, &vars);
        stability.encode_stability(self.instance, &vars, sink);
        Ok(vars)
    }

    fn encode_one_to_one(&self, sink: &mut dyn ModelSink, vars: &MatchingVars) {
        for m in 1..=self.instance.n_men() {
            let row = self
                .instance
                .man_preferences(m)
                .iter_acceptable()
                .filter_map(|w| vars.var(m, w))
                .map(|v| (1, v))
                .collect::<Vec<(i64, VarHandle)>>();
            if row.len() > 1 {
                sink.add_linear_constraint(&row, Relation::LessOrEqual, 1);
            }
        }
        for w in 1..=self.instance.n_women() {
            let column = self
                .instance
                .woman_preferences(w)
                .iter_acceptable()
                .filter_map(|m| vars.var(m, w))
                .map(|v| (1, v))
                .collect::<Vec<(i64, VarHandle)>>();
            if column.len() > 1 {
                sink.add_linear_constraint(&column, Relation::LessOrEqual, 1);
            }
        }
    }
}
