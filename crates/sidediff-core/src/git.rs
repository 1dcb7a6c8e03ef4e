//! Git integration: running `git diff` and listing changed files

use crate::align::{align_reader, AlignError};
use crate::line::DiffRow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;
use thiserror::Error;

/// Context length large enough to cover any file
const FULL_CONTEXT_LINES: u32 = 999_999;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepo,
    #[error("Git command failed: {0}")]
    CommandFailed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Align(#[from] AlignError),
}

/// Which working tree changes to compare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffMode {
    /// Staged and unstaged changes against HEAD
    #[default]
    All,
    /// Only staged changes (`--cached`)
    Staged,
    /// Only unstaged changes
    Unstaged,
}

impl DiffMode {
    fn base_args(self) -> &'static [&'static str] {
        match self {
            DiffMode::All => &["diff", "HEAD"],
            DiffMode::Staged => &["diff", "--cached"],
            DiffMode::Unstaged => &["diff"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DiffMode::All => "all",
            DiffMode::Staged => "staged",
            DiffMode::Unstaged => "unstaged",
        }
    }
}

impl fmt::Display for DiffMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiffMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(DiffMode::All),
            "staged" => Ok(DiffMode::Staged),
            "unstaged" => Ok(DiffMode::Unstaged),
            other => Err(format!("unknown diff mode '{}'", other)),
        }
    }
}

/// How many unchanged lines to show around each change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextLines {
    /// Git's default (usually 3)
    #[default]
    Default,
    Lines(u32),
    /// The whole file
    Full,
}

/// Parameters for a `git diff` invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffRequest {
    pub mode: DiffMode,
    pub context: ContextLines,
    /// `from..to` commit range; overrides `mode` when set
    pub range: Option<String>,
    pub path: Option<PathBuf>,
}

impl DiffRequest {
    pub fn new(mode: DiffMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_context(mut self, context: ContextLines) -> Self {
        self.context = context;
        self
    }

    pub fn with_range_spec(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Arguments for `git diff`, without any extra output-format flags
    pub fn args(&self) -> Vec<String> {
        self.args_with(&[])
    }

    fn args_with(&self, extra: &[&str]) -> Vec<String> {
        let mut args: Vec<String> = match &self.range {
            Some(range) => vec!["diff".to_string(), range.clone()],
            None => self.mode.base_args().iter().map(|s| s.to_string()).collect(),
        };
        args.extend(extra.iter().map(|s| s.to_string()));

        match self.context {
            ContextLines::Default => {}
            ContextLines::Lines(n) => args.push(format!("-U{}", n)),
            ContextLines::Full => args.push(format!("-U{}", FULL_CONTEXT_LINES)),
        }

        if let Some(path) = &self.path {
            args.push("--".to_string());
            args.push(path.display().to_string());
        }
        args
    }
}

/// Status of a file in git
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Modified,
    Added,
    Deleted,
    Renamed,
    Unknown,
}

impl FileStatus {
    pub fn symbol(self) -> char {
        match self {
            FileStatus::Modified => 'M',
            FileStatus::Added => 'A',
            FileStatus::Deleted => 'D',
            FileStatus::Renamed => 'R',
            FileStatus::Unknown => '?',
        }
    }
}

/// A changed file with its line totals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub path: String,
    pub status: FileStatus,
    pub additions: usize,
    pub deletions: usize,
}

fn git(repo_path: &Path, args: &[String]) -> Result<String, GitError> {
    tracing::debug!(repo = %repo_path.display(), ?args, "running git");
    let output = Command::new("git")
        .arg("-C")
        .arg(repo_path)
        .args(args)
        .output()?;

    if !output.status.success() {
        return Err(GitError::CommandFailed(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Check if a directory is a git repository
pub fn is_git_repo(path: &Path) -> bool {
    Command::new("git")
        .arg("-C")
        .arg(path)
        .arg("rev-parse")
        .arg("--git-dir")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Get the current git branch name
pub fn get_current_branch(path: &Path) -> Result<String, GitError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(path)
        .arg("rev-parse")
        .arg("--abbrev-ref")
        .arg("HEAD")
        .output()?;

    if !output.status.success() {
        return Err(GitError::NotARepo);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Get the root of the git repository
pub fn get_repo_root(path: &Path) -> Result<PathBuf, GitError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(path)
        .arg("rev-parse")
        .arg("--show-toplevel")
        .output()?;

    if !output.status.success() {
        return Err(GitError::NotARepo);
    }

    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok(PathBuf::from(root))
}

/// Where the viewer gets its file list and aligned rows from
pub trait DiffSource {
    fn modified_files(&self, request: &DiffRequest) -> Result<Vec<FileStat>, GitError>;
    fn load_rows(&self, request: &DiffRequest) -> Result<Vec<DiffRow>, GitError>;
}

/// A git working tree, addressed by its root directory
#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// Open the repository containing `path`
    pub fn discover(path: &Path) -> Result<Self, GitError> {
        if !is_git_repo(path) {
            return Err(GitError::NotARepo);
        }
        Ok(Self {
            root: get_repo_root(path)?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DiffSource for GitRepo {
    fn modified_files(&self, request: &DiffRequest) -> Result<Vec<FileStat>, GitError> {
        modified_files(&self.root, request)
    }

    fn load_rows(&self, request: &DiffRequest) -> Result<Vec<DiffRow>, GitError> {
        load_rows(&self.root, request)
    }
}

/// List changed files for `request`, with per-file addition/deletion counts.
///
/// The request's path and context settings are ignored; every changed
/// file in scope is listed.
pub fn modified_files(repo_path: &Path, request: &DiffRequest) -> Result<Vec<FileStat>, GitError> {
    let scope = DiffRequest {
        mode: request.mode,
        range: request.range.clone(),
        ..DiffRequest::default()
    };
    let numstat = git(repo_path, &scope.args_with(&["--numstat"]))?;
    let name_status = git(repo_path, &scope.args_with(&["--name-status"]))?;
    Ok(combine_stats(&numstat, &name_status))
}

/// Raw unified diff text for `request`
pub fn file_diff(repo_path: &Path, request: &DiffRequest) -> Result<String, GitError> {
    git(repo_path, &request.args())
}

/// Run `git diff` for `request` and align the output into rows
pub fn load_rows(repo_path: &Path, request: &DiffRequest) -> Result<Vec<DiffRow>, GitError> {
    let diff = file_diff(repo_path, request)?;
    Ok(align_reader(diff.as_bytes())?)
}

fn parse_numstat(output: &str) -> Vec<(String, usize, usize)> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.splitn(3, '\t');
            let additions = parts.next()?;
            let deletions = parts.next()?;
            let path = parts.next()?;
            // Binary files report "-" for both counts
            Some((
                normalize_numstat_path(path),
                additions.parse().unwrap_or(0),
                deletions.parse().unwrap_or(0),
            ))
        })
        .collect()
}

/// Renames appear as `old => new` or `dir/{old => new}/file` in numstat output
fn normalize_numstat_path(path: &str) -> String {
    if let (Some(open), Some(close)) = (path.find('{'), path.find('}')) {
        if let Some(inner) = path.get(open + 1..close) {
            if let Some((_, new)) = inner.split_once(" => ") {
                let joined = format!("{}{}{}", &path[..open], new, &path[close + 1..]);
                return joined.replace("//", "/");
            }
        }
    }
    match path.split_once(" => ") {
        Some((_, new)) => new.to_string(),
        None => path.to_string(),
    }
}

fn combine_stats(numstat: &str, name_status: &str) -> Vec<FileStat> {
    let counts = parse_numstat(numstat);
    let mut files = Vec::new();

    for line in name_status.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split('\t').collect();
        if parts.len() < 2 {
            continue;
        }

        let status = match parts[0].chars().next() {
            Some('M') => FileStatus::Modified,
            Some('A') => FileStatus::Added,
            Some('D') => FileStatus::Deleted,
            Some('R') => FileStatus::Renamed,
            _ => FileStatus::Unknown,
        };
        // For renames the new path is last
        let path = parts[parts.len() - 1].to_string();
        let (additions, deletions) = counts
            .iter()
            .find(|(p, _, _)| *p == path)
            .map(|&(_, a, d)| (a, d))
            .unwrap_or((0, 0));

        files.push(FileStat {
            path,
            status,
            additions,
            deletions,
        });
    }

    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_per_mode() {
        assert_eq!(DiffRequest::new(DiffMode::All).args(), vec!["diff", "HEAD"]);
        assert_eq!(
            DiffRequest::new(DiffMode::Staged).args(),
            vec!["diff", "--cached"]
        );
        assert_eq!(DiffRequest::new(DiffMode::Unstaged).args(), vec!["diff"]);
    }

    #[test]
    fn test_args_with_context_and_path() {
        let request = DiffRequest::new(DiffMode::Staged)
            .with_context(ContextLines::Full)
            .with_path("src/main.rs");
        assert_eq!(
            request.args(),
            vec!["diff", "--cached", "-U999999", "--", "src/main.rs"]
        );

        let request = DiffRequest::new(DiffMode::All).with_context(ContextLines::Lines(5));
        assert_eq!(request.args(), vec!["diff", "HEAD", "-U5"]);
    }

    #[test]
    fn test_range_overrides_mode() {
        let request = DiffRequest::new(DiffMode::Staged).with_range_spec("main..feature");
        assert_eq!(request.args(), vec!["diff", "main..feature"]);
        assert_eq!(
            request.args_with(&["--numstat"]),
            vec!["diff", "main..feature", "--numstat"]
        );
    }

    #[test]
    fn test_diff_mode_round_trips_through_str() {
        for mode in [DiffMode::All, DiffMode::Staged, DiffMode::Unstaged] {
            assert_eq!(mode.to_string().parse::<DiffMode>(), Ok(mode));
        }
        assert!("both".parse::<DiffMode>().is_err());
    }

    #[test]
    fn test_combine_stats() {
        let numstat = "3\t1\tsrc/main.rs\n10\t0\tsrc/new.rs\n-\t-\tassets/logo.png\n";
        let name_status = "M\tsrc/main.rs\nA\tsrc/new.rs\nD\tassets/logo.png\n";
        let files = combine_stats(numstat, name_status);

        assert_eq!(files.len(), 3);
        assert_eq!(files[0].status, FileStatus::Modified);
        assert_eq!((files[0].additions, files[0].deletions), (3, 1));
        assert_eq!(files[1].status, FileStatus::Added);
        assert_eq!(files[1].additions, 10);
        assert_eq!(files[2].status, FileStatus::Deleted);
        assert_eq!((files[2].additions, files[2].deletions), (0, 0));
    }

    #[test]
    fn test_combine_stats_with_rename() {
        let numstat = "1\t1\tsrc/{old.rs => new.rs}\n";
        let name_status = "R087\tsrc/old.rs\tsrc/new.rs\n";
        let files = combine_stats(numstat, name_status);

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, "src/new.rs");
        assert_eq!(files[0].status, FileStatus::Renamed);
        assert_eq!((files[0].additions, files[0].deletions), (1, 1));
    }

    #[test]
    fn test_normalize_numstat_path() {
        assert_eq!(normalize_numstat_path("a.rs => b.rs"), "b.rs");
        assert_eq!(normalize_numstat_path("src/{a => b}/c.rs"), "src/b/c.rs");
        assert_eq!(normalize_numstat_path("src/{ => b}/c.rs"), "src/b/c.rs");
        assert_eq!(normalize_numstat_path("plain.rs"), "plain.rs");
    }
}
