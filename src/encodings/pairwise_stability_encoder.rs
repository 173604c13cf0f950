use super::{MatchingVars, ModelSink, Relation, StabilityEncoder, VarHandle};
use crate::smti::Instance;

/// The direct rendition of the stability requirement.
///
/// For every acceptable pair (m, w), with `L` the sum of the variables
/// matching m to a woman he ranks at least as well as w and `R` the sum of the
/// variables matching w to a man she ranks at least as well as m, the encoder
/// states `L + R ≥ 1`: when m is matched to nobody he weakly prefers to w, w
/// must be matched to somebody she weakly prefers to m, otherwise the pair
/// blocks.
///
/// Variables absent from the model (pairs acceptable to one side only)
/// contribute an empty sum; the inequality itself is emitted for every
/// acceptable pair.
pub struct PairwiseStabilityEncoder;

impl StabilityEncoder for PairwiseStabilityEncoder {
    fn encode_stability(&self, instance: &Instance, vars: &MatchingVars, sink: &mut dyn ModelSink) {
        for (m, w) in instance.iter_acceptable_pairs() {
            let mut terms = instance
                .man_preferences(m)
                .weakly_preferred(w)
                .iter()
                .filter_map(|&w2| vars.var(m, w2))
                .map(|v| (1, v))
                .collect::<Vec<(i64, VarHandle)>>();
            // the pair variable itself is already part of the left sum
            terms.extend(
                instance
                    .woman_preferences(w)
                    .weakly_preferred(m)
                    .iter()
                    .filter(|&&m2| m2 != m)
                    .filter_map(|&m2| vars.var(m2, w))
                    .map(|v| (1, v)),
            );
            sink.add_linear_constraint(&terms, Relation::GreaterOrEqual, 1);
        }
    }
}
