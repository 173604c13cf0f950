use crate::smti::{Instance, MalformedPreferenceError, PreferenceList};
use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::io::{BufRead, BufReader, Read};

/// The type of callback functions to call when warnings are raised while
/// parsing an instance.
pub type WarningHandler = Box<dyn Fn(usize, String)>;

lazy_static! {
    static ref AGENT_LINE_PATTERN: Regex =
        Regex::new(r"^\s*(\d+)((?:\s*(?:\([^()]*\)|\{[^{}]*\}|\d+))*)\s*$").unwrap();
    static ref TIE_GROUP_PATTERN: Regex =
        Regex::new(r"\(([^()]*)\)|\{([^{}]*)\}|(\d+)").unwrap();
}

/// A reader for MAX-SMTI instance files.
///
/// The expected format is textual: the first line is a free header and is
/// ignored, the second line holds the number of men and the third one the
/// number of women.
/// They are followed by one line per man then one line per woman, each made of
/// the agent uid followed by its tie groups, ordered from the most preferred
/// to the least preferred one.
/// A tie group is written `(1 2)`; the brace form `{1,2}` is accepted as an
/// equivalent surface syntax, and a bare uid stands for a singleton group.
///
/// # Example
///
/// ```
/// # use matchop::io::SmtiReader;
/// let text = "# a tiny instance\n1\n1\n1 (1)\n1 (1)\n";
/// let instance = SmtiReader::default().read(&mut text.as_bytes()).unwrap();
/// assert_eq!(1, instance.n_men());
/// ```
#[derive(Default)]
pub struct SmtiReader {
    warning_handlers: Vec<WarningHandler>,
}

impl SmtiReader {
    /// Reads an [`Instance`].
    ///
    /// In case warnings are raised, the callback functions registered by
    /// [add_warning_handler](Self::add_warning_handler) are triggered.
    pub fn read(&self, reader: &mut dyn Read) -> Result<Instance> {
        let mut lines = BufReader::new(reader).lines().enumerate();
        next_content_line(&mut lines, "the header line")?;
        let (_, n_men) = read_count(&mut lines, "the number of men")?;
        let (_, n_women) = read_count(&mut lines, "the number of women")?;
        let men = self.read_agent_lines(&mut lines, n_men, "man")?;
        let women = self.read_agent_lines(&mut lines, n_women, "woman")?;
        if let Some((i, line)) = next_line_opt(&mut lines)? {
            if !line.trim().is_empty() {
                return Err(anyhow!(r#"unexpected trailing line "{}""#, line.trim()))
                    .with_context(|| format!("while reading line with index {}", i));
            }
        }
        Instance::new(men, women).context("while checking the cross-references of the instance")
    }

    /// Adds a callback function to call when warnings are raised while
    /// parsing an instance.
    pub fn add_warning_handler(&mut self, h: WarningHandler) {
        self.warning_handlers.push(h);
    }

    fn read_agent_lines(
        &self,
        lines: &mut Lines,
        n_agents: usize,
        side: &str,
    ) -> Result<Vec<PreferenceList>> {
        let mut result: Vec<Option<PreferenceList>> = (0..n_agents).map(|_| None).collect();
        for _ in 0..n_agents {
            let (i, line) = next_content_line(lines, &format!("a {} line", side))?;
            let context = || format!("while reading line with index {}", i);
            let captures = AGENT_LINE_PATTERN
                .captures(&line)
                .ok_or_else(|| anyhow!(r#"syntax error in line "{}""#, line.trim()))
                .with_context(context)?;
            let uid = captures
                .get(1)
                .unwrap()
                .as_str()
                .parse::<usize>()
                .map_err(|_| anyhow!("unreadable {} uid", side))
                .with_context(context)?;
            if uid == 0 || uid > n_agents {
                return Err(anyhow!("no {} has uid {}", side, uid)).with_context(context);
            }
            if result[uid - 1].is_some() {
                return Err(anyhow!("duplicate preference line for {} {}", side, uid))
                    .with_context(context);
            }
            let groups = read_tie_groups(captures.get(2).unwrap().as_str())
                .and_then(PreferenceList::from_groups)
                .with_context(context)?;
            if groups.n_tie_groups() == 0 {
                self.warn(1 + i, format!("{} {} finds nobody acceptable", side, uid));
            }
            result[uid - 1] = Some(groups);
        }
        Ok(result.into_iter().map(|list| list.unwrap()).collect())
    }

    fn warn(&self, line: usize, message: String) {
        self.warning_handlers
            .iter()
            .for_each(|h| (h)(line, message.clone()));
    }
}

type Lines<'a> = std::iter::Enumerate<std::io::Lines<BufReader<&'a mut dyn Read>>>;

fn next_line_opt(lines: &mut Lines) -> Result<Option<(usize, String)>> {
    match lines.next() {
        Some((i, line)) => {
            let line = line.with_context(|| format!("while reading line with index {}", i))?;
            Ok(Some((i, line)))
        }
        None => Ok(None),
    }
}

fn next_content_line(lines: &mut Lines, expected: &str) -> Result<(usize, String)> {
    match next_line_opt(lines)? {
        Some(line) => Ok(line),
        None => Err(anyhow!("missing {}: the input ends too early", expected)),
    }
}

fn read_count(lines: &mut Lines, expected: &str) -> Result<(usize, usize)> {
    let (i, line) = next_content_line(lines, expected)?;
    let count = line
        .trim()
        .parse::<usize>()
        .with_context(|| format!(r#"while reading {} in line "{}""#, expected, line.trim()))?;
    Ok((i, count))
}

fn read_tie_groups(text: &str) -> Result<Vec<Vec<usize>>, MalformedPreferenceError> {
    TIE_GROUP_PATTERN
        .captures_iter(text)
        .map(|captures| {
            if let Some(singleton) = captures.get(3) {
                return parse_uid(singleton.as_str()).map(|uid| vec![uid]);
            }
            let inner = captures
                .get(1)
                .or_else(|| captures.get(2))
                .unwrap()
                .as_str();
            inner
                .split(|c: char| c.is_ascii_whitespace() || c == ',')
                .filter(|token| !token.is_empty())
                .map(parse_uid)
                .collect()
        })
        .collect()
}

fn parse_uid(token: &str) -> Result<usize, MalformedPreferenceError> {
    token
        .parse::<usize>()
        .map_err(|_| MalformedPreferenceError::new(format!(r#""{}" is not a valid uid"#, token)))
}
