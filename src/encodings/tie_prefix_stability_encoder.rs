use super::{MatchingVars, ModelLiteral, ModelSink, StabilityEncoder, VarHandle};
use crate::smti::Instance;

/// The propositional rendition of the stability requirement, based on
/// tie-prefix counter variables.
///
/// Expressing "w is matched to somebody in one of her best i tie groups"
/// directly costs a clause per (man, woman, rank) triple.
/// This encoder instead introduces, for each woman w and each 1-based tie
/// group index i, an auxiliary variable q[w,i] meaning "w is matched to nobody
/// in her top i tie groups", and links consecutive indexes with implication
/// clauses.
/// The stability clause of an acceptable pair (m, w) then only needs the
/// matching variables of m and the single counter of w at m's rank:
/// either m is matched to a woman he ranks at least as well as w, or q[w,
/// rank(w, m)] is false, that is, w is matched to a man she weakly prefers
/// to m.
pub struct TiePrefixStabilityEncoder;

/// The per-woman arrays of tie-prefix counter variables.
///
/// Counters are indexed by woman uid and 1-based tie group rank.
/// The linking clauses guarantee the prefix property: whenever q[w,i] holds
/// for some i > 1, q[w,i-1] holds as well.
pub struct TiePrefixCounters {
    per_woman: Vec<Vec<VarHandle>>,
}

impl TiePrefixCounters {
    /// Returns the counter variable of a woman at the given 1-based rank.
    ///
    /// # Panics
    ///
    /// Panics if the woman uid or the rank is out of range.
    pub fn counter(&self, woman: usize, rank: usize) -> VarHandle {
        self.per_woman[woman - 1][rank - 1]
    }

    /// Returns the counter variables of a woman, one per tie group of her
    /// preference list.
    pub fn counters_of_woman(&self, woman: usize) -> &[VarHandle] {
        &self.per_woman[woman - 1]
    }
}

impl TiePrefixStabilityEncoder {
    /// Encodes the stability requirement and returns the declared counters.
    pub fn encode_with_counters(
        &self,
        instance: &Instance,
        vars: &MatchingVars,
        sink: &mut dyn ModelSink,
    ) -> TiePrefixCounters {
        let counters = declare_counters(instance, sink);
        for w in 1..=instance.n_women() {
            encode_counter_links(instance, vars, sink, &counters, w);
        }
        for (m, w) in instance.iter_acceptable_pairs() {
            encode_stability_clause(instance, vars, sink, &counters, m, w);
        }
        counters
    }
}

impl StabilityEncoder for TiePrefixStabilityEncoder {
    fn encode_stability(&self, instance: &Instance, vars: &MatchingVars, sink: &mut dyn ModelSink) {
        self.encode_with_counters(instance, vars, sink);
    }
}

fn declare_counters(instance: &Instance, sink: &mut dyn ModelSink) -> TiePrefixCounters {
    let per_woman = (1..=instance.n_women())
        .map(|w| {
            (1..=instance.woman_preferences(w).n_tie_groups())
                .map(|i| sink.new_binary_variable(format!("q_w{}_{}", w, i)))
                .collect()
        })
        .collect();
    TiePrefixCounters { per_woman }
}

fn encode_counter_links(
    instance: &Instance,
    vars: &MatchingVars,
    sink: &mut dyn ModelSink,
    counters: &TiePrefixCounters,
    w: usize,
) {
    let preferences = instance.woman_preferences(w);
    for i in 1..=preferences.n_tie_groups() {
        let q_i = counters.counter(w, i);
        let group_vars = preferences
            .tie_group(i)
            .iter()
            .filter_map(|&m| vars.var(m, w))
            .collect::<Vec<VarHandle>>();
        // a matched suitor of rank i falsifies q[w,i]
        for &v in &group_vars {
            sink.add_clause(&[ModelLiteral::negative(v), ModelLiteral::negative(q_i)]);
        }
        let mut clause = Vec::with_capacity(group_vars.len() + 2);
        if i == 1 {
            // no rank-1 suitor matched implies q[w,1]
            clause.extend(group_vars.iter().map(|&v| ModelLiteral::positive(v)));
            clause.push(ModelLiteral::positive(q_i));
            sink.add_clause(&clause);
        } else {
            let q_prev = counters.counter(w, i - 1);
            // q[w,i-1] with no rank-i suitor matched implies q[w,i]
            clause.push(ModelLiteral::negative(q_prev));
            clause.extend(group_vars.iter().map(|&v| ModelLiteral::positive(v)));
            clause.push(ModelLiteral::positive(q_i));
            sink.add_clause(&clause);
            // the prefix property: q[w,i] implies q[w,i-1]
            sink.add_clause(&[ModelLiteral::negative(q_i), ModelLiteral::positive(q_prev)]);
        }
    }
}

fn encode_stability_clause(
    instance: &Instance,
    vars: &MatchingVars,
    sink: &mut dyn ModelSink,
    counters: &TiePrefixCounters,
    m: usize,
    w: usize,
) {
    let rank = instance.woman_preferences(w).rank(m).unwrap();
    let mut clause = instance
        .man_preferences(m)
        .weakly_preferred(w)
        .iter()
        .filter_map(|&w2| vars.var(m, w2))
        .map(ModelLiteral::positive)
        .collect::<Vec<ModelLiteral>>();
    clause.push(ModelLiteral::negative(counters.counter(w, rank)));
    sink.add_clause(&clause);
}
