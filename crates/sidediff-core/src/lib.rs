//! Sidediff Core - aligns unified diffs into side-by-side rows
//!
//! Unified diff text goes in, rows of old/new line pairs come out. Deletions
//! and additions from the same changed region share rows, so unchanged lines
//! land at the same height on both sides.

pub mod align;
pub mod column;
pub mod git;
pub mod line;
pub mod search;

pub use align::{align_reader, align_str, classify, AlignError, Aligner, Classified, DiffStats};
pub use column::{line_number_width, render_column, ColumnLine, Paint};
pub use git::{
    ContextLines, DiffMode, DiffRequest, DiffSource, FileStat, FileStatus, GitError, GitRepo,
};
pub use line::{DiffLine, DiffRow, LineKind, Side};
pub use search::{search_rows, SearchMatch, SearchState};
