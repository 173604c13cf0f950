use super::{Instance, Matching};
use anyhow::{anyhow, Result};

/// The objective used to discriminate the stable matchings of an instance.
///
/// Selecting an objective never alters the stability, acceptability or
/// one-to-one requirements; it only changes which stable matching is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveKind {
    /// Maximize the number of matched pairs.
    MaxCardinality,
    /// Minimize the sum of both sides' ranks over the matched pairs.
    Egalitarian,
    /// Minimize the absolute difference between the rank sums of the two sides.
    SexEqual,
}

impl ObjectiveKind {
    /// Returns a short string representing the objective.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectiveKind::MaxCardinality => "maxcard",
            ObjectiveKind::Egalitarian => "egalitarian",
            ObjectiveKind::SexEqual => "sexequal",
        }
    }

    /// Returns the value of this objective for a matching of the instance.
    ///
    /// Unmatched agents contribute nothing; ranks are 1-based.
    pub fn value(&self, instance: &Instance, matching: &Matching) -> i64 {
        match self {
            ObjectiveKind::MaxCardinality => matching.cardinality() as i64,
            ObjectiveKind::Egalitarian => man_rank_sum(instance, matching) + woman_rank_sum(instance, matching),
            ObjectiveKind::SexEqual => {
                (man_rank_sum(instance, matching) - woman_rank_sum(instance, matching)).abs()
            }
        }
    }

    /// Returns `true` if and only if the candidate value is strictly better
    /// than the incumbent one for this objective.
    pub fn is_improvement(&self, candidate: i64, incumbent: i64) -> bool {
        match self {
            ObjectiveKind::MaxCardinality => candidate > incumbent,
            ObjectiveKind::Egalitarian | ObjectiveKind::SexEqual => candidate < incumbent,
        }
    }
}

impl TryFrom<&str> for ObjectiveKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "maxcard" => Ok(ObjectiveKind::MaxCardinality),
            "egalitarian" => Ok(ObjectiveKind::Egalitarian),
            "sexequal" => Ok(ObjectiveKind::SexEqual),
            _ => Err(anyhow!(r#"undefined objective "{}""#, value)),
        }
    }
}

fn man_rank_sum(instance: &Instance, matching: &Matching) -> i64 {
    matching
        .iter_pairs()
        .map(|(m, w)| instance.man_preferences(m).rank(w).unwrap() as i64)
        .sum()
}

fn woman_rank_sum(instance: &Instance, matching: &Matching) -> i64 {
    matching
        .iter_pairs()
        .map(|(m, w)| instance.woman_preferences(w).rank(m).unwrap() as i64)
        .sum()
}
