//! Element-set text ingestion.
//!
//! Raw text is a sequence of three-line groups: a display name followed by
//! the two fixed-format element lines. Grouping happens here; validation of
//! the line contents is deferred to [`OrbitalState::build`](crate::OrbitalState::build)
//! so that one bad group never aborts the batch.

use crate::error::ParseError;

/// Raw element set as read from text. Not guaranteed to be propagatable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrbitalElementSet {
    /// Display name (first line of the group, trimmed).
    pub name: String,
    /// First element line.
    pub line1: String,
    /// Second element line.
    pub line2: String,
}

impl OrbitalElementSet {
    /// Create an element set from its three lines.
    pub fn new(name: impl Into<String>, line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line1: line1.into(),
            line2: line2.into(),
        }
    }
}

/// Lazy iterator over the complete groups of a raw text.
///
/// A trailing group with fewer than three lines is never yielded.
pub struct ElementSetIter<'a> {
    lines: std::str::Lines<'a>,
}

impl<'a> ElementSetIter<'a> {
    /// Iterate the groups of `raw`. Leading and trailing whitespace of the
    /// whole text is ignored.
    pub fn new(raw: &'a str) -> Self {
        Self {
            lines: raw.trim().lines(),
        }
    }
}

impl Iterator for ElementSetIter<'_> {
    type Item = OrbitalElementSet;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.lines.next()?;
        let line1 = self.lines.next()?;
        let line2 = self.lines.next()?;
        Some(OrbitalElementSet::new(name.trim(), line1.trim(), line2.trim()))
    }
}

/// Parse raw text into element sets, preserving source order and duplicates.
pub fn parse_element_sets(raw: &str) -> Vec<OrbitalElementSet> {
    let sets: Vec<OrbitalElementSet> = ElementSetIter::new(raw).collect();
    let line_count = raw.trim().lines().count();
    let dropped = line_count - sets.len() * 3;
    if dropped > 0 {
        tracing::debug!(dropped, "Dropped incomplete trailing element-set group");
    }
    sets
}

/// Like [`parse_element_sets`] but fails if no complete group exists.
pub fn parse_element_sets_nonempty(raw: &str) -> Result<Vec<OrbitalElementSet>, ParseError> {
    let sets = parse_element_sets(raw);
    if sets.is_empty() {
        Err(ParseError::Empty)
    } else {
        Ok(sets)
    }
}
