use crate::smti::Matching;
use anyhow::{Context, Result};
use std::io::Write;

/// A writer rendering matchings as one `m<id> - w<id>` line per matched pair.
///
/// Single men are omitted by default; [write_with_singles](Self::write_with_singles)
/// renders them as `m<id> - single` lines instead.
#[derive(Default)]
pub struct MatchingWriter;

impl MatchingWriter {
    /// Writes the matched pairs, single men being omitted.
    pub fn write(&self, writer: &mut dyn Write, matching: &Matching) -> Result<()> {
        let context = "while writing a matching";
        for (m, w) in matching.iter_pairs() {
            writeln!(writer, "m{} - w{}", m, w).context(context)?;
        }
        writer.flush().context(context)
    }

    /// Writes one line per man, the single ones being rendered with the
    /// `single` keyword.
    pub fn write_with_singles(&self, writer: &mut dyn Write, matching: &Matching) -> Result<()> {
        let context = "while writing a matching";
        for m in 1..=matching.n_men() {
            match matching.partner_of_man(m) {
                Some(w) => writeln!(writer, "m{} - w{}", m, w).context(context)?,
                None => writeln!(writer, "m{} - single", m).context(context)?,
            }
        }
        writer.flush().context(context)
    }
}
