use super::{MalformedPreferenceError, PreferenceList};

/// A MAX-SMTI instance: one preference list per man and one per woman.
///
/// Agents are designated by 1-based uids, unique within their side.
/// An instance owns its preference tables and is immutable once built; all
/// encoders consume it read-only.
///
/// # Example
///
/// ```
/// # use matchop::smti::{Instance, PreferenceList};
/// let men = vec![PreferenceList::from_groups(vec![vec![1]]).unwrap()];
/// let women = vec![PreferenceList::from_groups(vec![vec![1]]).unwrap()];
/// let instance = Instance::new(men, women).unwrap();
/// assert!(instance.acceptable(1, 1));
/// ```
#[derive(Debug)]
pub struct Instance {
    men: Vec<PreferenceList>,
    women: Vec<PreferenceList>,
}

impl Instance {
    /// Builds an instance from the preference lists of the men and the women.
    ///
    /// An error is returned if a list refers to a uid outside the range of the
    /// opposite side.
    pub fn new(
        men: Vec<PreferenceList>,
        women: Vec<PreferenceList>,
    ) -> Result<Self, MalformedPreferenceError> {
        check_referenced_uids(&men, women.len(), "man", "woman")?;
        check_referenced_uids(&women, men.len(), "woman", "man")?;
        Ok(Self { men, women })
    }

    /// Returns the number of men in the instance.
    pub fn n_men(&self) -> usize {
        self.men.len()
    }

    /// Returns the number of women in the instance.
    pub fn n_women(&self) -> usize {
        self.women.len()
    }

    /// Returns the preference list of a man.
    ///
    /// # Panics
    ///
    /// Panics if no man has the given uid.
    pub fn man_preferences(&self, uid: usize) -> &PreferenceList {
        &self.men[uid - 1]
    }

    /// Returns the preference list of a woman.
    ///
    /// # Panics
    ///
    /// Panics if no woman has the given uid.
    pub fn woman_preferences(&self, uid: usize) -> &PreferenceList {
        &self.women[uid - 1]
    }

    /// Returns `true` if and only if the pair is acceptable, that is, each
    /// agent belongs to the preference list of the other one.
    ///
    /// Both directions are required; this conjunction governs which matching
    /// variables may ever be set.
    pub fn acceptable(&self, man: usize, woman: usize) -> bool {
        self.men[man - 1].accepts(woman) && self.women[woman - 1].accepts(man)
    }

    /// Iterates over the acceptable pairs, men in increasing uid order and
    /// women in the preference order of each man.
    pub fn iter_acceptable_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (1..=self.men.len()).flat_map(move |m| {
            self.men[m - 1]
                .iter_acceptable()
                .filter(move |&w| self.women[w - 1].accepts(m))
                .map(move |w| (m, w))
        })
    }

    /// Iterates over the pairs that are not acceptable, that is, the pairs for
    /// which at least one side does not list the other.
    ///
    /// Such pairs never get a matching variable; this view quantifies the
    /// model reduction.
    pub fn mutually_unacceptable_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (1..=self.men.len()).flat_map(move |m| {
            (1..=self.women.len())
                .filter(move |&w| !self.acceptable(m, w))
                .map(move |w| (m, w))
        })
    }
}

fn check_referenced_uids(
    lists: &[PreferenceList],
    n_partners: usize,
    side: &str,
    other_side: &str,
) -> Result<(), MalformedPreferenceError> {
    for (index, list) in lists.iter().enumerate() {
        if let Some(uid) = list.iter_acceptable().find(|&uid| uid > n_partners) {
            return Err(MalformedPreferenceError::new(format!(
                "{} {} refers to {} {} but only {} exist",
                side,
                index + 1,
                other_side,
                uid,
                n_partners
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(groups: Vec<Vec<usize>>) -> PreferenceList {
        PreferenceList::from_groups(groups).unwrap()
    }

    #[test]
    fn test_acceptable_requires_both_sides() {
        let men = vec![list(vec![vec![1], vec![2]]), list(vec![vec![1]])];
        let women = vec![list(vec![vec![1]]), list(vec![vec![2]])];
        let instance = Instance::new(men, women).unwrap();
        assert!(instance.acceptable(1, 1));
        assert!(!instance.acceptable(1, 2));
        assert!(!instance.acceptable(2, 1));
        assert!(!instance.acceptable(2, 2));
    }

    #[test]
    fn test_iter_acceptable_pairs() {
        let men = vec![list(vec![vec![2], vec![1]]), list(vec![vec![1]])];
        let women = vec![list(vec![vec![1, 2]]), list(vec![vec![1]])];
        let instance = Instance::new(men, women).unwrap();
        assert_eq!(
            vec![(1, 2), (1, 1), (2, 1)],
            instance.iter_acceptable_pairs().collect::<Vec<(usize, usize)>>()
        );
    }

    #[test]
    fn test_mutually_unacceptable_pairs() {
        let men = vec![list(vec![vec![1], vec![2]]), list(vec![vec![1]])];
        let women = vec![list(vec![vec![1]]), list(vec![vec![2]])];
        let instance = Instance::new(men, women).unwrap();
        assert_eq!(
            vec![(1, 2), (2, 1), (2, 2)],
            instance
                .mutually_unacceptable_pairs()
                .collect::<Vec<(usize, usize)>>()
        );
    }

    #[test]
    fn test_referenced_uid_out_of_range() {
        let men = vec![list(vec![vec![2]])];
        let women = vec![list(vec![vec![1]])];
        assert!(Instance::new(men, women).is_err());
    }

    #[test]
    fn test_empty_preference_list_is_allowed() {
        let men = vec![list(vec![]), list(vec![vec![1]])];
        let women = vec![list(vec![vec![2]])];
        let instance = Instance::new(men, women).unwrap();
        assert!(!instance.acceptable(1, 1));
        assert!(instance.acceptable(2, 1));
    }
}
