//! Unified diff alignment engine

use crate::line::{DiffLine, DiffRow, LineKind};
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlignError {
    /// Reading the input failed. Rows aligned before the failure are kept
    /// in `partial`, with pending changes already flushed.
    #[error("Failed to read diff input: {source}")]
    Read {
        #[source]
        source: io::Error,
        partial: Vec<DiffRow>,
    },
}

impl AlignError {
    /// Rows produced before the read failed
    pub fn into_partial_rows(self) -> Vec<DiffRow> {
        match self {
            AlignError::Read { partial, .. } => partial,
        }
    }
}

/// What a raw unified diff line means, decided before any buffering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classified<'a> {
    /// `diff`, `index`, `---` and `+++` preamble
    Metadata,
    HunkHeader(&'a str),
    Deletion(&'a str),
    Addition(&'a str),
    /// Space-prefixed or empty line
    Context(&'a str),
    /// Anything else, e.g. `\ No newline at end of file`
    Unknown(&'a str),
}

const METADATA_PREFIXES: [&str; 4] = ["diff", "index", "---", "+++"];

/// Classify a single line of unified diff text (without its line terminator)
pub fn classify(line: &str) -> Classified<'_> {
    // Metadata is checked first so `---`/`+++` never count as content.
    if METADATA_PREFIXES
        .iter()
        .any(|prefix| line.starts_with(prefix))
    {
        return Classified::Metadata;
    }
    if line.starts_with("@@") {
        return Classified::HunkHeader(line);
    }

    match line.as_bytes().first() {
        None | Some(b' ') => Classified::Context(line),
        Some(b'-') => Classified::Deletion(line),
        Some(b'+') => Classified::Addition(line),
        Some(_) => Classified::Unknown(line),
    }
}

/// Converts a stream of unified diff lines into side-by-side rows.
///
/// Deletions and additions are buffered until the next context line, hunk
/// header or end of input, then paired by position. Each flush yields
/// `max(deletions, additions)` rows; the shorter side is padded with `None`.
#[derive(Debug)]
pub struct Aligner {
    rows: Vec<DiffRow>,
    pending_deletes: Vec<String>,
    pending_inserts: Vec<String>,
    old_line_num: usize,
    new_line_num: usize,
}

impl Default for Aligner {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            pending_deletes: Vec::new(),
            pending_inserts: Vec::new(),
            old_line_num: 1,
            new_line_num: 1,
        }
    }
}

impl Aligner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next line number to be assigned on the old side
    pub fn old_line_num(&self) -> usize {
        self.old_line_num
    }

    /// Next line number to be assigned on the new side
    pub fn new_line_num(&self) -> usize {
        self.new_line_num
    }

    /// Rows emitted so far, excluding anything still buffered
    pub fn rows(&self) -> &[DiffRow] {
        &self.rows
    }

    /// Feed one line of diff text, without its line terminator
    pub fn push_line(&mut self, line: &str) {
        match classify(line) {
            Classified::Metadata => {}
            Classified::HunkHeader(text) => {
                self.flush_pending_changes();
                self.rows.push(DiffRow::header(text));
            }
            Classified::Deletion(text) => self.pending_deletes.push(text.to_string()),
            Classified::Addition(text) => self.pending_inserts.push(text.to_string()),
            Classified::Context(text) => {
                self.flush_pending_changes();
                self.rows
                    .push(DiffRow::context(text, self.old_line_num, self.new_line_num));
                self.old_line_num += 1;
                self.new_line_num += 1;
            }
            Classified::Unknown(text) => {
                tracing::trace!(line = text, "dropping unrecognized diff line");
            }
        }
    }

    /// Drain anything still buffered and return the finished rows
    pub fn finish(mut self) -> Vec<DiffRow> {
        self.flush_pending_changes();
        self.rows
    }

    fn flush_pending_changes(&mut self) {
        if self.pending_deletes.is_empty() && self.pending_inserts.is_empty() {
            return;
        }

        let mut deletes = std::mem::take(&mut self.pending_deletes).into_iter();
        let mut inserts = std::mem::take(&mut self.pending_inserts).into_iter();
        let count = deletes.len().max(inserts.len());
        self.rows.reserve(count);

        for _ in 0..count {
            let old = deletes.next().map(|text| {
                let line = DiffLine::deletion(text).with_number(self.old_line_num);
                self.old_line_num += 1;
                line
            });
            let new = inserts.next().map(|text| {
                let line = DiffLine::addition(text).with_number(self.new_line_num);
                self.new_line_num += 1;
                line
            });
            self.rows.push(DiffRow::paired(old, new));
        }
    }
}

/// Align diff text that is already in memory
pub fn align_str(diff: &str) -> Vec<DiffRow> {
    let mut aligner = Aligner::new();
    for line in diff.lines() {
        aligner.push_line(line);
    }
    aligner.finish()
}

/// Align diff text read from `reader`.
///
/// Bytes that are not valid UTF-8 are decoded lossily; only I/O failures
/// are reported as errors.
pub fn align_reader<R: BufRead>(mut reader: R) -> Result<Vec<DiffRow>, AlignError> {
    let mut aligner = Aligner::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let text = String::from_utf8_lossy(trim_line_ending(&buf));
                aligner.push_line(&text);
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(AlignError::Read {
                    source,
                    partial: aligner.finish(),
                })
            }
        }
    }

    Ok(aligner.finish())
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Addition and deletion totals for a set of rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
}

impl DiffStats {
    pub fn from_rows(rows: &[DiffRow]) -> Self {
        let mut stats = Self::default();
        for row in rows {
            if row
                .old
                .as_ref()
                .is_some_and(|line| line.kind == LineKind::Deletion)
            {
                stats.deletions += 1;
            }
            if row
                .new
                .as_ref()
                .is_some_and(|line| line.kind == LineKind::Addition)
            {
                stats.additions += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::Side;

    fn numbered(row: &DiffRow, side: Side) -> Option<(&str, Option<usize>)> {
        row.side(side).map(|l| (l.content.as_str(), l.number))
    }

    #[test]
    fn test_classify_markers() {
        assert_eq!(classify("diff --git a/x b/x"), Classified::Metadata);
        assert_eq!(classify("index 83db48f..bf269f4 100644"), Classified::Metadata);
        assert_eq!(classify("--- a/x"), Classified::Metadata);
        assert_eq!(classify("+++ b/x"), Classified::Metadata);
        assert_eq!(classify("@@ -1 +1 @@"), Classified::HunkHeader("@@ -1 +1 @@"));
        assert_eq!(classify("-a"), Classified::Deletion("-a"));
        assert_eq!(classify("+a"), Classified::Addition("+a"));
        assert_eq!(classify(" a"), Classified::Context(" a"));
        assert_eq!(classify(""), Classified::Context(""));
        assert_eq!(
            classify("\\ No newline at end of file"),
            Classified::Unknown("\\ No newline at end of file")
        );
    }

    #[test]
    fn test_deletion_then_context() {
        let rows = align_str("-a\n b\n");

        assert_eq!(rows.len(), 2);
        assert_eq!(numbered(&rows[0], Side::Old), Some(("-a", Some(1))));
        assert_eq!(numbered(&rows[0], Side::New), None);
        assert_eq!(numbered(&rows[1], Side::Old), Some((" b", Some(2))));
        assert_eq!(numbered(&rows[1], Side::New), Some((" b", Some(1))));
    }

    #[test]
    fn test_uneven_change_block_is_padded() {
        let rows = align_str("-a\n-b\n+x\n+y\n+z\n c\n");

        assert_eq!(rows.len(), 4);
        assert_eq!(numbered(&rows[0], Side::Old), Some(("-a", Some(1))));
        assert_eq!(numbered(&rows[0], Side::New), Some(("+x", Some(1))));
        assert_eq!(numbered(&rows[1], Side::Old), Some(("-b", Some(2))));
        assert_eq!(numbered(&rows[1], Side::New), Some(("+y", Some(2))));
        assert_eq!(numbered(&rows[2], Side::Old), None);
        assert_eq!(numbered(&rows[2], Side::New), Some(("+z", Some(3))));
        assert_eq!(numbered(&rows[3], Side::Old), Some((" c", Some(3))));
        assert_eq!(numbered(&rows[3], Side::New), Some((" c", Some(4))));
    }

    #[test]
    fn test_lone_hunk_header() {
        let mut aligner = Aligner::new();
        aligner.push_line("@@ -1,2 +1,2 @@");

        assert_eq!(aligner.old_line_num(), 1);
        assert_eq!(aligner.new_line_num(), 1);

        let rows = aligner.finish();
        assert_eq!(rows, vec![DiffRow::header("@@ -1,2 +1,2 @@")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(align_str("").is_empty());
    }

    #[test]
    fn test_unknown_marker_is_dropped() {
        let mut aligner = Aligner::new();
        aligner.push_line("?what");

        assert_eq!(aligner.old_line_num(), 1);
        assert_eq!(aligner.new_line_num(), 1);
        assert!(aligner.finish().is_empty());
    }

    #[test]
    fn test_no_newline_marker_does_not_split_block() {
        let rows = align_str("-old\n\\ No newline at end of file\n+new\n\\ No newline at end of file\n");

        assert_eq!(rows.len(), 1);
        assert_eq!(numbered(&rows[0], Side::Old), Some(("-old", Some(1))));
        assert_eq!(numbered(&rows[0], Side::New), Some(("+new", Some(1))));
    }

    #[test]
    fn test_empty_line_is_context() {
        let rows = align_str("+a\n\n");

        assert_eq!(rows.len(), 2);
        assert_eq!(numbered(&rows[1], Side::Old), Some(("", Some(1))));
        assert_eq!(numbered(&rows[1], Side::New), Some(("", Some(2))));
    }

    #[test]
    fn test_header_flushes_pending() {
        let rows = align_str("+a\n@@ -10 +11 @@\n-b\n");

        assert_eq!(rows.len(), 3);
        assert_eq!(numbered(&rows[0], Side::New), Some(("+a", Some(1))));
        assert!(rows[1].is_header());
        assert_eq!(numbered(&rows[2], Side::Old), Some(("-b", Some(1))));
    }

    #[test]
    fn test_metadata_only_yields_nothing() {
        let input = "diff --git a/f b/f\nindex 1..2 100644\n--- a/f\n+++ b/f\n";
        assert!(align_str(input).is_empty());
    }

    #[test]
    fn test_reader_strips_crlf_and_tolerates_invalid_utf8() {
        let input: &[u8] = b" a\r\n-\xff\r\n+b";
        let rows = align_reader(input).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(numbered(&rows[0], Side::Old), Some((" a", Some(1))));
        assert_eq!(numbered(&rows[1], Side::Old), Some(("-\u{fffd}", Some(2))));
        assert_eq!(numbered(&rows[1], Side::New), Some(("+b", Some(2))));
    }

    struct FailingReader {
        served: bool,
    }

    impl io::Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
            }
            self.served = true;
            let data = b" a\n-b\n";
            buf[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }
    }

    #[test]
    fn test_read_failure_keeps_partial_rows() {
        let reader = io::BufReader::new(FailingReader { served: false });
        let err = align_reader(reader).unwrap_err();

        assert!(err.to_string().contains("pipe closed"));
        let rows = err.into_partial_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(numbered(&rows[1], Side::Old), Some(("-b", Some(2))));
    }

    #[test]
    fn test_stats() {
        let rows = align_str("@@ -1,2 +1,3 @@\n-a\n+x\n+y\n c\n");
        assert_eq!(
            DiffStats::from_rows(&rows),
            DiffStats {
                additions: 2,
                deletions: 1
            }
        );
    }
}
