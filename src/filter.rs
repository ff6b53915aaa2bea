//! Helpers for include/exclude filtering with pattern sets.

use crate::pattern::{Pattern, PatternFlag};
use crate::relative_path::RelativePath;

/// A compiled pattern wrapped as a predicate over [`RelativePath`]s.
///
/// Testing a file always requires a full match. Testing a directory requires a full
/// match too, unless `partial_match_dirs` is set, in which case it is enough for the
/// directory to be a valid prefix toward a match. That is the mode a tree walker uses
/// to decide where descending is still worthwhile.
#[derive(Clone, Debug)]
pub struct PatternMatcher {
    partial_match_dirs: bool,
    pattern: Pattern,
}

impl PatternMatcher {
    /// Create a new predicate from a compiled pattern.
    pub fn new(partial_match_dirs: bool, pattern: Pattern) -> Self {
        Self {
            partial_match_dirs,
            pattern,
        }
    }

    /// Directly access the pattern.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Test a path against the pattern.
    pub fn matches(&self, path: &RelativePath) -> bool {
        if path.is_file() || !self.partial_match_dirs {
            self.pattern.matches(path.segments())
        } else {
            self.pattern.is_prefix_of(path.segments())
        }
    }
}

/// An ordered set of patterns combined into a single predicate with logical or.
///
/// Evaluation short-circuits on the first matching pattern, in insertion order. The
/// empty set matches every path, consistent with "no patterns specified".
#[derive(Clone, Debug, Default)]
pub struct PatternsMatcher {
    matchers: Vec<PatternMatcher>,
}

impl PatternsMatcher {
    /// Compile a set of textual patterns into a single predicate.
    pub fn new<I>(partial_match_dirs: bool, flags: PatternFlag, patterns: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            matchers: patterns
                .into_iter()
                .map(|pattern| PatternMatcher::new(partial_match_dirs, Pattern::new(pattern, flags)))
                .collect(),
        }
    }

    /// Whether this set contains no patterns.
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Number of patterns in this set.
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Test a path against the set. The empty set matches everything.
    pub fn matches(&self, path: &RelativePath) -> bool {
        self.matchers.is_empty() || self.matches_any(path)
    }

    /// Test whether at least one pattern in the set matches. Unlike
    /// [`matches`](PatternsMatcher::matches) the empty set matches nothing here; this
    /// is the form an exclusion list wants.
    pub fn matches_any(&self, path: &RelativePath) -> bool {
        self.matchers.iter().any(|matcher| matcher.matches(path))
    }
}

/// Combines include and exclude pattern sets into a single path filter.
///
/// A path is selected when the include set matches it (an empty include set selects
/// everything) and no exclude pattern matches it. Include patterns test directories in
/// partial-match mode, so a walker keeps descending into directories that may still
/// contain included files; exclude patterns prune a directory only on a full match.
#[derive(Clone, Debug)]
pub struct PatternFilter {
    flags: PatternFlag,
    includes: PatternsMatcher,
    excludes: PatternsMatcher,
}

impl PatternFilter {
    /// Create an empty filter, selecting every path.
    pub fn new(flags: PatternFlag) -> Self {
        Self {
            flags,
            includes: PatternsMatcher::default(),
            excludes: PatternsMatcher::default(),
        }
    }

    /// Builder method to add an include pattern.
    pub fn include<T: AsRef<str>>(mut self, pattern: T) -> Self {
        self.includes
            .matchers
            .push(PatternMatcher::new(true, Pattern::new(pattern, self.flags)));
        self
    }

    /// Builder method to add an exclude pattern.
    pub fn exclude<T: AsRef<str>>(mut self, pattern: T) -> Self {
        self.excludes
            .matchers
            .push(PatternMatcher::new(false, Pattern::new(pattern, self.flags)));
        self
    }

    /// Directly access the include set.
    pub fn includes(&self) -> &PatternsMatcher {
        &self.includes
    }

    /// Directly access the exclude set.
    pub fn excludes(&self) -> &PatternsMatcher {
        &self.excludes
    }

    /// Test whether a path is selected by this filter.
    pub fn selects(&self, path: &RelativePath) -> bool {
        self.includes.matches(path) && !self.excludes.matches_any(path)
    }
}

#[test]
fn test_pattern_matcher_dispatch() {
    let matcher = PatternMatcher::new(true, Pattern::new("src/*.rs", PatternFlag::empty()));
    assert_eq!(matcher.pattern().pattern(), "src/*.rs");

    // the directory is a valid prefix, but not a full match
    assert!(matcher.matches(&RelativePath::parse(false, "src")));
    assert!(!matcher.matches(&RelativePath::parse(true, "src")));

    assert!(matcher.matches(&RelativePath::parse(true, "src/lib.rs")));
    assert!(!matcher.matches(&RelativePath::parse(true, "src/lib.txt")));
}

#[test]
fn test_patterns_matcher() {
    let matcher = PatternsMatcher::new(false, PatternFlag::empty(), ["a/*", "b/*"]);
    assert_eq!(matcher.len(), 2);
    assert!(!matcher.is_empty());
    assert!(matcher.matches(&RelativePath::parse(true, "a/1")));
    assert!(matcher.matches(&RelativePath::parse(true, "b/2")));
    assert!(!matcher.matches(&RelativePath::parse(true, "c/3")));
    assert!(!matcher.matches(&RelativePath::parse(true, "a")));

    // an empty set matches every path
    let empty = PatternsMatcher::new(false, PatternFlag::empty(), Vec::<&str>::new());
    assert!(empty.is_empty());
    assert!(empty.matches(&RelativePath::parse(true, "anything")));
    assert!(!empty.matches_any(&RelativePath::parse(true, "anything")));
}

#[test]
fn test_partial_match_dirs() {
    let matcher = PatternsMatcher::new(true, PatternFlag::empty(), ["a/**/z"]);
    let dir = RelativePath::parse(false, "a/b");
    let file = RelativePath::parse(true, "a/b");
    // the directory may still contain a `z`, the file never will
    assert!(matcher.matches(&dir));
    assert!(!matcher.matches(&file));

    let full_only = PatternsMatcher::new(false, PatternFlag::empty(), ["a/**/z"]);
    assert!(!full_only.matches(&dir));
    assert!(full_only.matches(&RelativePath::parse(false, "a/b/z")));

    let matcher = PatternsMatcher::new(true, PatternFlag::empty(), ["a/**"]);
    assert!(matcher.matches(&RelativePath::parse(false, "a")));
    assert!(!matcher.matches(&RelativePath::parse(false, "b")));
}

#[test]
fn test_pattern_filter() {
    let filter = PatternFilter::new(PatternFlag::empty())
        .include("src/")
        .include("*.md")
        .exclude("**/*.tmp");
    assert_eq!(filter.includes().len(), 2);
    assert_eq!(filter.excludes().len(), 1);

    assert!(filter.selects(&RelativePath::parse(true, "src/lib.rs")));
    assert!(filter.selects(&RelativePath::parse(true, "README.md")));
    assert!(!filter.selects(&RelativePath::parse(true, "notes.txt")));
    // excludes win over includes
    assert!(!filter.selects(&RelativePath::parse(true, "src/scratch.tmp")));

    // empty includes select everything not excluded
    let filter = PatternFilter::new(PatternFlag::empty()).exclude("target/");
    assert!(filter.selects(&RelativePath::parse(true, "src/lib.rs")));
    assert!(!filter.selects(&RelativePath::parse(true, "target/debug/foo")));

    // the empty filter selects everything
    let filter = PatternFilter::new(PatternFlag::empty());
    assert!(filter.selects(&RelativePath::parse(true, "anything/at/all")));

    let filter = PatternFilter::new(PatternFlag::IGNORE_CASE).include("SRC/**");
    assert!(filter.selects(&RelativePath::parse(true, "src/lib.rs")));
}

#[test]
fn test_filter_directory_pruning() {
    let filter = PatternFilter::new(PatternFlag::empty())
        .include("src/**/*.rs")
        .exclude("**/generated/**");

    // directories are kept while they can still contain included files
    assert!(filter.selects(&RelativePath::parse(false, "src")));
    assert!(filter.selects(&RelativePath::parse(false, "src/pattern")));
    assert!(!filter.selects(&RelativePath::parse(false, "docs")));

    // an excluded subtree is pruned, files inside it included or not
    assert!(!filter.selects(&RelativePath::parse(false, "src/generated")));
    assert!(!filter.selects(&RelativePath::parse(false, "src/generated/api")));
    assert!(!filter.selects(&RelativePath::parse(true, "src/generated/api.rs")));

    // walking a subtree with `join` keeps selecting correctly
    let dir = RelativePath::parse(false, "src");
    assert!(filter.selects(&dir.join(true, "lib.rs")));
    assert!(!filter.selects(&dir.join(true, "notes.md")));
}
