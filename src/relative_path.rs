//! A segment-based view of paths below a file tree root.

use std::fmt;

/// A path relative to the root of a file tree: an ordered list of segments plus a flag
/// for whether the path denotes a file or a directory.
///
/// Segments contain no separators. Matchers only read the path; it never changes after
/// construction.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct RelativePath {
    segments: Vec<String>,
    is_file: bool,
}

impl RelativePath {
    /// Create a path from pre-split segments. The segments are kept verbatim.
    pub fn new<I>(is_file: bool, segments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            is_file,
        }
    }

    /// Parse a path from a string, splitting on `/` and `\`.
    ///
    /// Empty segments from leading, trailing or doubled separators are dropped, so
    /// `/a//b/` parses the same as `a/b`.
    pub fn parse<T: AsRef<str>>(is_file: bool, path: T) -> Self {
        Self {
            segments: path
                .as_ref()
                .split(['/', '\\'])
                .filter(|segment| !segment.is_empty())
                .map(String::from)
                .collect(),
            is_file,
        }
    }

    /// Parse a path, classifying file vs. directory from a file mode as retrieved from
    /// `stat()`. Everything that is not a directory counts as a file.
    pub fn parse_with_mode<T: AsRef<str>>(path: T, file_mode: u32) -> Self {
        Self::parse(file_mode & libc::S_IFMT != libc::S_IFDIR, path)
    }

    /// The path's segments, in order from the tree root.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether this path denotes a file rather than a directory.
    pub fn is_file(&self) -> bool {
        self.is_file
    }

    /// The final segment, if any.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Create a path one level below this one. Used by walkers descending a tree.
    pub fn join<T: Into<String>>(&self, is_file: bool, segment: T) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments, is_file }
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

#[test]
fn test_parse() {
    let path = RelativePath::parse(true, "src/main/App.java");
    assert_eq!(path.segments(), ["src", "main", "App.java"]);
    assert!(path.is_file());
    assert_eq!(path.name(), Some("App.java"));
    assert_eq!(path.to_string(), "src/main/App.java");

    // separator styles and stray separators collapse
    assert_eq!(RelativePath::parse(true, "src\\main"), RelativePath::parse(true, "/src//main/"));

    let empty = RelativePath::parse(false, "");
    assert!(empty.segments().is_empty());
    assert_eq!(empty.name(), None);
}

#[test]
fn test_join() {
    let dir = RelativePath::parse(false, "src");
    let child = dir.join(false, "pattern");
    let file = child.join(true, "mod.rs");
    assert_eq!(file.segments(), ["src", "pattern", "mod.rs"]);
    assert!(!child.is_file());
    assert!(file.is_file());
    assert_eq!(file.to_string(), "src/pattern/mod.rs");
}

#[test]
fn test_parse_with_mode() {
    let dir = RelativePath::parse_with_mode("a/b", libc::S_IFDIR);
    assert!(!dir.is_file());

    let file = RelativePath::parse_with_mode("a/b", libc::S_IFREG);
    assert!(file.is_file());

    // symlinks and other non-directories count as files
    let link = RelativePath::parse_with_mode("a/b", libc::S_IFLNK);
    assert!(link.is_file());
}
