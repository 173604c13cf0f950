use super::{ModelSink, VarHandle};
use crate::smti::Instance;
use std::collections::HashMap;

/// The registry of the matching decision variables of an instance.
///
/// One 0/1 variable is declared per acceptable pair; pairs unacceptable on at
/// least one side get no variable at all.
/// The registry is owned by the encoding that created it, so that several
/// instances may be processed in the same process without sharing state.
pub struct MatchingVars {
    by_pair: HashMap<(usize, usize), VarHandle>,
    pairs: Vec<((usize, usize), VarHandle)>,
}

impl MatchingVars {
    pub(crate) fn declare(instance: &Instance, sink: &mut dyn ModelSink) -> Self {
        let mut by_pair = HashMap::new();
        let mut pairs = Vec::new();
        for (m, w) in instance.iter_acceptable_pairs() {
            let handle = sink.new_binary_variable(format!("x_m{}_w{}", m, w));
            by_pair.insert((m, w), handle);
            pairs.push(((m, w), handle));
        }
        Self { by_pair, pairs }
    }

    /// Returns the variable standing for "m is matched to w", or `None` if
    /// the pair is not acceptable.
    pub fn var(&self, man: usize, woman: usize) -> Option<VarHandle> {
        self.by_pair.get(&(man, woman)).copied()
    }

    /// Returns the number of declared matching variables.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if and only if no variable was declared.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over the (pair, variable) couples in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), VarHandle)> + '_ {
        self.pairs.iter().copied()
    }
}
