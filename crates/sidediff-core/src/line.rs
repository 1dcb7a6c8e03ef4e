//! Line and row representation for aligned diffs

use serde::{Deserialize, Serialize};

/// The semantic kind of a diff line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    /// Unchanged line present on both sides
    Context,
    /// Line present only in the new file
    Addition,
    /// Line present only in the old file
    Deletion,
    /// Hunk header (`@@ ... @@`)
    Header,
    /// Unrecognized marker; never emitted into a row
    Unknown,
}

/// One column of the aligned output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Old,
    New,
}

/// A single piece of diff content assigned to one side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    /// 1-based line number within this side's file; `None` for headers
    pub number: Option<usize>,
    /// Raw text, including the leading marker character
    pub content: String,
    pub kind: LineKind,
}

impl DiffLine {
    pub fn new(kind: LineKind, content: impl Into<String>) -> Self {
        Self {
            number: None,
            content: content.into(),
            kind,
        }
    }

    pub fn context(content: impl Into<String>) -> Self {
        Self::new(LineKind::Context, content)
    }

    pub fn addition(content: impl Into<String>) -> Self {
        Self::new(LineKind::Addition, content)
    }

    pub fn deletion(content: impl Into<String>) -> Self {
        Self::new(LineKind::Deletion, content)
    }

    pub fn header(content: impl Into<String>) -> Self {
        Self::new(LineKind::Header, content)
    }

    pub fn with_number(mut self, number: usize) -> Self {
        self.number = Some(number);
        self
    }
}

/// A pair of vertically aligned lines.
///
/// An empty side is padding: the other side has content at this position
/// and this side has nothing to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRow {
    pub old: Option<DiffLine>,
    pub new: Option<DiffLine>,
}

impl DiffRow {
    pub fn paired(old: Option<DiffLine>, new: Option<DiffLine>) -> Self {
        Self { old, new }
    }

    /// Unchanged line shown at the same position on both sides
    pub fn context(content: &str, old_number: usize, new_number: usize) -> Self {
        Self {
            old: Some(DiffLine::context(content).with_number(old_number)),
            new: Some(DiffLine::context(content).with_number(new_number)),
        }
    }

    /// Hunk boundary shown on both sides, unnumbered
    pub fn header(content: &str) -> Self {
        Self {
            old: Some(DiffLine::header(content)),
            new: Some(DiffLine::header(content)),
        }
    }

    pub fn side(&self, side: Side) -> Option<&DiffLine> {
        match side {
            Side::Old => self.old.as_ref(),
            Side::New => self.new.as_ref(),
        }
    }

    pub fn is_header(&self) -> bool {
        self.old
            .as_ref()
            .is_some_and(|line| line.kind == LineKind::Header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_row_is_unnumbered() {
        let row = DiffRow::header("@@ -1 +1 @@");
        assert!(row.is_header());
        assert_eq!(row.side(Side::Old).unwrap().number, None);
        assert_eq!(row.side(Side::New).unwrap().number, None);
        assert_eq!(row.side(Side::New).unwrap().kind, LineKind::Header);
    }

    #[test]
    fn test_padding_is_distinct_from_empty_content() {
        let padded = DiffRow::paired(None, Some(DiffLine::addition("+").with_number(1)));
        let empty = DiffRow::context("", 1, 1);

        assert!(padded.side(Side::Old).is_none());
        assert_eq!(empty.side(Side::Old).unwrap().content, "");
        assert_eq!(padded.side(Side::New).unwrap().kind, LineKind::Addition);
        assert!(!empty.is_header());
    }
}
