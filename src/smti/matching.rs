use super::Instance;
use anyhow::{anyhow, Result};

/// A matching: a partial injective mapping between the men and the women of an
/// instance.
///
/// Each agent is mapped to at most one partner of the opposite side, or left
/// single.
/// Matchings are produced once per successful solve and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matching {
    man_partner: Vec<Option<usize>>,
    woman_partner: Vec<Option<usize>>,
}

impl Matching {
    /// Builds a matching from a set of (man uid, woman uid) pairs.
    ///
    /// An error is returned if a uid is out of range, if an agent appears in
    /// more than one pair or if a pair is not acceptable in the instance.
    pub fn from_pairs(instance: &Instance, pairs: &[(usize, usize)]) -> Result<Self> {
        let mut man_partner = vec![None; instance.n_men()];
        let mut woman_partner = vec![None; instance.n_women()];
        for &(m, w) in pairs {
            if m == 0 || m > instance.n_men() {
                return Err(anyhow!("no man has uid {}", m));
            }
            if w == 0 || w > instance.n_women() {
                return Err(anyhow!("no woman has uid {}", w));
            }
            if !instance.acceptable(m, w) {
                return Err(anyhow!("the pair (m{}, w{}) is not acceptable", m, w));
            }
            if man_partner[m - 1].is_some() {
                return Err(anyhow!("man {} is matched more than once", m));
            }
            if woman_partner[w - 1].is_some() {
                return Err(anyhow!("woman {} is matched more than once", w));
            }
            man_partner[m - 1] = Some(w);
            woman_partner[w - 1] = Some(m);
        }
        Ok(Self {
            man_partner,
            woman_partner,
        })
    }

    /// Returns the number of men in the underlying instance.
    pub fn n_men(&self) -> usize {
        self.man_partner.len()
    }

    /// Returns the number of matched pairs.
    pub fn cardinality(&self) -> usize {
        self.man_partner.iter().filter(|p| p.is_some()).count()
    }

    /// Returns the partner of a man, or `None` if he is single.
    ///
    /// # Panics
    ///
    /// Panics if no man has the given uid.
    pub fn partner_of_man(&self, uid: usize) -> Option<usize> {
        self.man_partner[uid - 1]
    }

    /// Returns the partner of a woman, or `None` if she is single.
    ///
    /// # Panics
    ///
    /// Panics if no woman has the given uid.
    pub fn partner_of_woman(&self, uid: usize) -> Option<usize> {
        self.woman_partner[uid - 1]
    }

    /// Iterates over the matched pairs, in increasing man uid order.
    pub fn iter_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.man_partner
            .iter()
            .enumerate()
            .filter_map(|(index, p)| p.map(|w| (index + 1, w)))
    }

    /// Returns the pairs blocking this matching.
    ///
    /// An acceptable pair (m, w) not matched together is blocking when m is
    /// not matched to a woman he ranks at least as well as w, and w is not
    /// matched to a man she ranks at least as well as m.
    pub fn blocking_pairs(&self, instance: &Instance) -> Vec<(usize, usize)> {
        instance
            .iter_acceptable_pairs()
            .filter(|&(m, w)| {
                if self.partner_of_man(m) == Some(w) {
                    return false;
                }
                let man_list = instance.man_preferences(m);
                let man_satisfied = self
                    .partner_of_man(m)
                    .is_some_and(|w2| man_list.rank(w2).unwrap() <= man_list.rank(w).unwrap());
                let woman_list = instance.woman_preferences(w);
                let woman_satisfied = self
                    .partner_of_woman(w)
                    .is_some_and(|m2| woman_list.rank(m2).unwrap() <= woman_list.rank(m).unwrap());
                !man_satisfied && !woman_satisfied
            })
            .collect()
    }

    /// Returns `true` if and only if no acceptable pair blocks this matching.
    pub fn is_stable(&self, instance: &Instance) -> bool {
        self.blocking_pairs(instance).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smti::PreferenceList;

    fn list(groups: Vec<Vec<usize>>) -> PreferenceList {
        PreferenceList::from_groups(groups).unwrap()
    }

    fn tied_instance() -> Instance {
        // woman 1 ranks both men in a single tie group, woman 2 ranks them strictly
        let men = vec![list(vec![vec![1]]), list(vec![vec![1]])];
        let women = vec![list(vec![vec![1, 2]]), list(vec![vec![1], vec![2]])];
        Instance::new(men, women).unwrap()
    }

    #[test]
    fn test_from_pairs_ok() {
        let instance = tied_instance();
        let matching = Matching::from_pairs(&instance, &[(1, 1)]).unwrap();
        assert_eq!(1, matching.cardinality());
        assert_eq!(Some(1), matching.partner_of_man(1));
        assert_eq!(None, matching.partner_of_man(2));
        assert_eq!(Some(1), matching.partner_of_woman(1));
        assert_eq!(vec![(1, 1)], matching.iter_pairs().collect::<Vec<(usize, usize)>>());
    }

    #[test]
    fn test_from_pairs_unknown_uid() {
        let instance = tied_instance();
        assert!(Matching::from_pairs(&instance, &[(3, 1)]).is_err());
        assert!(Matching::from_pairs(&instance, &[(1, 3)]).is_err());
    }

    #[test]
    fn test_from_pairs_unacceptable() {
        let instance = tied_instance();
        assert!(Matching::from_pairs(&instance, &[(1, 2)]).is_err());
    }

    #[test]
    fn test_from_pairs_one_to_one_violation() {
        let men = vec![list(vec![vec![1, 2]])];
        let women = vec![list(vec![vec![1]]), list(vec![vec![1]])];
        let instance = Instance::new(men, women).unwrap();
        assert!(Matching::from_pairs(&instance, &[(1, 1), (1, 2)]).is_err());
    }

    #[test]
    fn test_both_tied_matchings_are_stable() {
        let instance = tied_instance();
        for pairs in [[(1, 1)], [(2, 1)]] {
            let matching = Matching::from_pairs(&instance, &pairs).unwrap();
            assert!(matching.is_stable(&instance), "{:?}", pairs);
        }
    }

    #[test]
    fn test_empty_matching_is_blocked() {
        let instance = tied_instance();
        let matching = Matching::from_pairs(&instance, &[]).unwrap();
        assert!(!matching.is_stable(&instance));
        assert_eq!(vec![(1, 1), (2, 1)], matching.blocking_pairs(&instance));
    }

    #[test]
    fn test_blocking_requires_both_sides_to_improve() {
        // m1 strictly prefers w1, but w1 weakly prefers her partner m2
        let men = vec![list(vec![vec![1], vec![2]]), list(vec![vec![1, 2]])];
        let women = vec![list(vec![vec![1, 2]]), list(vec![vec![1, 2]])];
        let instance = Instance::new(men, women).unwrap();
        let matching = Matching::from_pairs(&instance, &[(1, 2), (2, 1)]).unwrap();
        assert!(matching.is_stable(&instance));
    }

    #[test]
    fn test_man_with_empty_list_stays_single() {
        let men = vec![list(vec![]), list(vec![vec![1]])];
        let women = vec![list(vec![vec![1, 2]])];
        let instance = Instance::new(men, women).unwrap();
        let matching = Matching::from_pairs(&instance, &[(2, 1)]).unwrap();
        assert!(matching.is_stable(&instance));
        assert!(Matching::from_pairs(&instance, &[(1, 1)]).is_err());
    }
}
