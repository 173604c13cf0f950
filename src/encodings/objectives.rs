use super::{MatchingVars, ModelSink, ObjectiveDirection, Relation, VarHandle};
use crate::smti::{Instance, ObjectiveKind};

/// Appends the requested objective construction to the sink.
///
/// Maximum cardinality maximizes the sum of the matching variables;
/// the egalitarian objective minimizes the rank-weighted sum over both sides;
/// the sex-equal objective introduces a fresh bounded integer variable `z`
/// standing for the absolute difference between the two sides' rank sums,
/// constrained from both directions and minimized.
///
/// The objectives are mutually exclusive per solve request; none of them
/// alters the constraints emitted before.
pub fn encode_objective(
    instance: &Instance,
    vars: &MatchingVars,
    sink: &mut dyn ModelSink,
    kind: ObjectiveKind,
) {
    match kind {
        ObjectiveKind::MaxCardinality => {
            let terms = vars.iter().map(|(_, v)| (1, v)).collect::<Vec<(i64, VarHandle)>>();
            sink.set_objective(&terms, ObjectiveDirection::Maximize);
        }
        ObjectiveKind::Egalitarian => {
            let terms = vars
                .iter()
                .map(|((m, w), v)| (man_rank(instance, m, w) + woman_rank(instance, m, w), v))
                .collect::<Vec<(i64, VarHandle)>>();
            sink.set_objective(&terms, ObjectiveDirection::Minimize);
        }
        ObjectiveKind::SexEqual => {
            let z = sink.new_domain_variable("z".to_string(), 0, rank_sum_bound(instance));
            for direction in [1, -1] {
                let mut terms = vec![(1, z)];
                terms.extend(vars.iter().filter_map(|((m, w), v)| {
                    let delta =
                        direction * (woman_rank(instance, m, w) - man_rank(instance, m, w));
                    if delta == 0 {
                        None
                    } else {
                        Some((delta, v))
                    }
                }));
                sink.add_linear_constraint(&terms, Relation::GreaterOrEqual, 0);
            }
            sink.set_objective(&[(1, z)], ObjectiveDirection::Minimize);
        }
    }
}

fn man_rank(instance: &Instance, m: usize, w: usize) -> i64 {
    instance.man_preferences(m).rank(w).unwrap() as i64
}

fn woman_rank(instance: &Instance, m: usize, w: usize) -> i64 {
    instance.woman_preferences(w).rank(m).unwrap() as i64
}

// an upper bound on both sides' rank sums: every agent matched at his worst rank
fn rank_sum_bound(instance: &Instance) -> i64 {
    let men_bound = (1..=instance.n_men())
        .map(|m| instance.man_preferences(m).n_tie_groups() as i64)
        .sum();
    let women_bound = (1..=instance.n_women())
        .map(|w| instance.woman_preferences(w).n_tie_groups() as i64)
        .sum();
    i64::max(men_bound, women_bound)
}
