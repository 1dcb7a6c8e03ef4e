//! Case-insensitive text search over aligned rows

use crate::line::{DiffRow, LineKind, Side};
use regex::{Regex, RegexBuilder};

/// A single occurrence of the query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    pub file_name: String,
    /// Index into the row slice; also the scroll target
    pub row_index: usize,
    pub side: Side,
    pub line_number: Option<usize>,
    /// Byte offset of the match within `content`
    pub column: usize,
    /// Byte length of the match within `content`
    pub length: usize,
    pub content: String,
}

fn query_regex(query: &str) -> Option<Regex> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Find every occurrence of `query` in `rows`, old side before new side.
///
/// Header lines are skipped. Overlapping occurrences are all reported.
pub fn search_rows(rows: &[DiffRow], query: &str, file_name: &str) -> Vec<SearchMatch> {
    if query.is_empty() {
        return Vec::new();
    }
    let Some(re) = query_regex(query) else {
        return Vec::new();
    };

    let mut matches = Vec::new();
    for (row_index, row) in rows.iter().enumerate() {
        for side in [Side::Old, Side::New] {
            let Some(line) = row.side(side) else {
                continue;
            };
            if line.kind == LineKind::Header {
                continue;
            }

            let content = line.content.as_str();
            let mut start = 0;
            while let Some(found) = re.find_at(content, start) {
                matches.push(SearchMatch {
                    file_name: file_name.to_string(),
                    row_index,
                    side,
                    line_number: line.number,
                    column: found.start(),
                    length: found.len(),
                    content: content.to_string(),
                });
                // Step one char past the match start so overlaps are found
                let step = content[found.start()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                start = found.start() + step;
                if start > content.len() {
                    break;
                }
            }
        }
    }

    matches
}

/// Current query results and the selected match
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub query: String,
    matches: Vec<SearchMatch>,
    current: Option<usize>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-run the search for `query` and select the first match
    pub fn update(&mut self, rows: &[DiffRow], query: &str, file_name: &str) {
        self.query = query.to_string();
        self.matches = search_rows(rows, query, file_name);
        self.current = if self.matches.is_empty() {
            None
        } else {
            Some(0)
        };
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.matches.clear();
        self.current = None;
    }

    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&SearchMatch> {
        self.current.and_then(|idx| self.matches.get(idx))
    }

    /// Select the next match, wrapping around
    pub fn next(&mut self) -> Option<&SearchMatch> {
        let idx = self.current?;
        self.current = Some((idx + 1) % self.matches.len());
        self.current()
    }

    /// Select the previous match, wrapping around
    pub fn prev(&mut self) -> Option<&SearchMatch> {
        let idx = self.current?;
        self.current = Some(idx.checked_sub(1).unwrap_or(self.matches.len() - 1));
        self.current()
    }

    /// Status text such as "Match 2 of 5"
    pub fn status(&self) -> Option<String> {
        match self.current {
            Some(idx) => Some(format!("Match {} of {}", idx + 1, self.matches.len())),
            None if !self.query.is_empty() => Some("No matches found".to_string()),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::align_str;

    #[test]
    fn test_search_is_case_insensitive_and_skips_headers() {
        let rows = align_str("@@ -1,2 +1,2 @@ fn Foo\n-let foo = 1;\n+let FOO = 2;\n");
        let matches = search_rows(&rows, "foo", "src/lib.rs");

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].row_index, 1);
        assert_eq!(matches[0].side, Side::Old);
        assert_eq!(matches[0].line_number, Some(1));
        assert_eq!(matches[0].column, 5);
        assert_eq!(matches[1].side, Side::New);
        assert_eq!(matches[1].file_name, "src/lib.rs");
    }

    #[test]
    fn test_search_reports_overlapping_matches() {
        let rows = align_str("+aaa\n");
        let columns: Vec<usize> = search_rows(&rows, "aa", "")
            .iter()
            .map(|m| m.column)
            .collect();
        assert_eq!(columns, vec![1, 2]);
    }

    #[test]
    fn test_search_treats_query_literally() {
        let rows = align_str(" a.b\n axb\n");
        let matches = search_rows(&rows, "a.b", "");
        // Context rows match on both sides
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.row_index == 0));
    }

    #[test]
    fn test_empty_query() {
        let rows = align_str(" a\n");
        assert!(search_rows(&rows, "", "").is_empty());
    }

    #[test]
    fn test_state_navigation_wraps() {
        let rows = align_str("-x\n+x\n x\n");
        let mut state = SearchState::new();
        state.update(&rows, "x", "f");

        assert_eq!(state.matches().len(), 4);
        assert_eq!(state.status().as_deref(), Some("Match 1 of 4"));
        assert_eq!(state.prev().map(|m| m.row_index), Some(1));
        assert_eq!(state.current_index(), Some(3));
        assert_eq!(state.next().map(|m| m.row_index), Some(0));
        assert_eq!(state.current_index(), Some(0));
    }

    #[test]
    fn test_state_without_matches() {
        let rows = align_str(" a\n");
        let mut state = SearchState::new();
        state.update(&rows, "zzz", "f");

        assert!(!state.has_matches());
        assert!(state.next().is_none());
        assert_eq!(state.status().as_deref(), Some("No matches found"));

        state.clear();
        assert_eq!(state.status(), None);
    }
}
