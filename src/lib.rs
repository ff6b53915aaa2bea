//! Ant-style include/exclude path matching.
//!
//! This implements a path `Pattern` similar to Ant's directory scanning patterns, and some
//! helper types to figure out whether a file should be included given its path relative to
//! a tree root and a set of include/exclude patterns.
//!
//! Patterns are matched segment by segment: `*` and `?` match within a single segment,
//! a whole-segment `**` matches any number of segments, and a trailing separator is
//! shorthand for appending `**`. Besides full matches, a compiled pattern can tell whether
//! a directory is still a valid *prefix* of a match, so a tree walker can skip descending
//! into directories that cannot lead anywhere.
//!
//! Here's a rather long matching example:
//!
//! ```
//! # use antpatterns::*;
//! let file_list: &[&str] = &[
//!     "src/lib.rs",
//!     "src/pattern.rs",
//!     "src/codegen/generated.rs",
//!     "docs/book/intro.md",
//!     "docs/notes.tmp",
//!     "README.md",
//! ];
//!
//! let filter = PatternFilter::new(PatternFlag::empty())
//!     .include("src/**/*.rs")
//!     .include("docs/")
//!     .exclude("**/codegen/**")
//!     .exclude("**/*.tmp");
//!
//! let selected: Vec<&str> = file_list
//!     .iter()
//!     .copied()
//!     .filter(|path| filter.selects(&RelativePath::parse(true, path)))
//!     .collect();
//! assert_eq!(selected, ["src/lib.rs", "src/pattern.rs", "docs/book/intro.md"]);
//!
//! // Directories are tested in partial-match mode on the include side, so a walker
//! // knows where descending can still produce matches:
//! assert!(filter.selects(&RelativePath::parse(false, "src")));
//! assert!(filter.selects(&RelativePath::parse(false, "docs/book")));
//! assert!(!filter.selects(&RelativePath::parse(false, "src/codegen")));
//! assert!(!filter.selects(&RelativePath::parse(false, "benches")));
//!
//! // Single patterns can be used on their own as well:
//! let pattern = Pattern::new("a/**/b", PatternFlag::empty());
//! assert!(pattern.matches(&["a", "b"]));
//! assert!(pattern.matches(&["a", "x", "y", "b"]));
//! assert!(!pattern.matches(&["a", "b", "c"]));
//! assert!(pattern.is_prefix_of(&["a", "x"]));
//! assert!(!pattern.is_prefix_of(&["c"]));
//!
//! let pattern = Pattern::new("*.TXT", PatternFlag::IGNORE_CASE);
//! assert!(pattern.matches(&["notes.txt"]));
//! ```

mod filter;
mod pattern;
mod relative_path;

#[doc(inline)]
pub use filter::{PatternFilter, PatternMatcher, PatternsMatcher};

#[doc(inline)]
pub use pattern::{Pattern, PatternFlag};

#[doc(inline)]
pub use relative_path::RelativePath;
