use crate::smti::{Instance, Matching};
use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::io::{BufRead, BufReader, Read};

lazy_static! {
    static ref MATCHED_LINE_PATTERN: Regex = Regex::new(r"^\s*m(\d+)\s*-\s*w(\d+)\s*$").unwrap();
    static ref SINGLE_LINE_PATTERN: Regex = Regex::new(r"^\s*m(\d+)\s*-\s*single\s*$").unwrap();
}

/// A reader for the matching format produced by
/// [MatchingWriter](crate::io::MatchingWriter).
///
/// Lines read `m<id> - w<id>` for a matched pair or `m<id> - single` for an
/// unmatched man; blank lines are ignored.
#[derive(Default)]
pub struct MatchingReader;

impl MatchingReader {
    /// Reads a matching of the given instance.
    ///
    /// An error is returned on a syntax error, or when the read pairs do not
    /// form a valid matching of the instance.
    pub fn read(&self, reader: &mut dyn Read, instance: &Instance) -> Result<Matching> {
        let mut pairs = Vec::new();
        for (i, line) in BufReader::new(reader).lines().enumerate() {
            let context = || format!("while reading line with index {}", i);
            let line = line.with_context(context)?;
            if line.trim().is_empty() {
                continue;
            }
            if let Some(captures) = MATCHED_LINE_PATTERN.captures(&line) {
                let m = captures
                    .get(1)
                    .unwrap()
                    .as_str()
                    .parse::<usize>()
                    .map_err(|_| anyhow!("unreadable man uid"))
                    .with_context(context)?;
                let w = captures
                    .get(2)
                    .unwrap()
                    .as_str()
                    .parse::<usize>()
                    .map_err(|_| anyhow!("unreadable woman uid"))
                    .with_context(context)?;
                pairs.push((m, w));
                continue;
            }
            if SINGLE_LINE_PATTERN.is_match(&line) {
                continue;
            }
            return Err(anyhow!(r#"syntax error in line "{}""#, line.trim())).with_context(context);
        }
        Matching::from_pairs(instance, &pairs).context("while building the matching")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smti::PreferenceList;

    fn instance() -> Instance {
        let men = vec![
            PreferenceList::from_groups(vec![vec![1]]).unwrap(),
            PreferenceList::from_groups(vec![]).unwrap(),
        ];
        let women = vec![PreferenceList::from_groups(vec![vec![1, 2]]).unwrap()];
        Instance::new(men, women).unwrap()
    }

    #[test]
    fn test_read_ok() {
        let instance = instance();
        let matching = MatchingReader
            .read(&mut "m1 - w1\nm2 - single\n".as_bytes(), &instance)
            .unwrap();
        assert_eq!(Some(1), matching.partner_of_man(1));
        assert_eq!(None, matching.partner_of_man(2));
    }

    #[test]
    fn test_read_blank_lines() {
        let instance = instance();
        let matching = MatchingReader
            .read(&mut "\nm1 - w1\n\n".as_bytes(), &instance)
            .unwrap();
        assert_eq!(1, matching.cardinality());
    }

    #[test]
    fn test_read_syntax_error() {
        let instance = instance();
        assert!(MatchingReader
            .read(&mut "m1 w1\n".as_bytes(), &instance)
            .is_err());
    }

    #[test]
    fn test_read_invalid_matching() {
        let instance = instance();
        assert!(MatchingReader
            .read(&mut "m2 - w1\n".as_bytes(), &instance)
            .is_err());
    }
}
