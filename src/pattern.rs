//! Compiling Ant-style path patterns into reusable matcher chains.

use std::mem;

use bitflags::bitflags;

bitflags! {
    /// Flags affecting how a pattern should match.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PatternFlag: u8 {
        /// Ignore upper/lower case when comparing segments. Note that this only affects ascii
        /// characters. We do not normalize/casefold unicode here. If you need this, case-fold
        /// your input strings and patterns first.
        const IGNORE_CASE = 0x01;
    }
}

/// One component of a wildcard segment.
#[derive(Clone, Debug)]
enum Component {
    /// A literal run of characters. The `a` and `.txt` in `a*.txt`.
    Literal(String),

    /// A question mark matches exactly one character within the segment.
    QuestionMark,

    /// A star matches any number of characters within the segment, including none.
    Star,
}

/// A compiled matcher for a single path segment.
///
/// Segments never contain separators, so neither `*` nor `?` can cross a directory
/// boundary here. There is no escaping mechanism; a literal `*` or `?` cannot be matched.
#[derive(Clone, Debug)]
struct PatternStep {
    flags: PatternFlag,
    kind: StepKind,
}

#[derive(Clone, Debug)]
enum StepKind {
    /// The whole segment compared verbatim, e.g. the `src` in `src/**`.
    Literal(String),

    /// A segment containing `*` or `?` wildcards, e.g. `*.txt`.
    Glob(Vec<Component>),
}

impl PatternStep {
    fn new(token: &str, flags: PatternFlag) -> Self {
        let ignore_case = flags.intersects(PatternFlag::IGNORE_CASE);

        if !token.contains(['*', '?']) {
            let text = if ignore_case {
                token.to_ascii_lowercase()
            } else {
                token.to_owned()
            };
            return Self {
                flags,
                kind: StepKind::Literal(text),
            };
        }

        let mut components = Vec::<Component>::new();
        let mut literal = String::new();

        fn push_literal(literal: &mut String, components: &mut Vec<Component>) {
            if !literal.is_empty() {
                components.push(Component::Literal(mem::take(literal)));
            }
        }

        for ch in token.chars() {
            match ch {
                '*' => {
                    push_literal(&mut literal, &mut components);
                    // consecutive stars match the same as a single one, swallow them
                    if !matches!(components.last(), Some(Component::Star)) {
                        components.push(Component::Star);
                    }
                }
                '?' => {
                    push_literal(&mut literal, &mut components);
                    components.push(Component::QuestionMark);
                }
                ch => literal.push(if ignore_case {
                    ch.to_ascii_lowercase()
                } else {
                    ch
                }),
            }
        }
        push_literal(&mut literal, &mut components);

        Self {
            flags,
            kind: StepKind::Glob(components),
        }
    }

    /// Check whether this step matches a single concrete segment.
    fn matches(&self, segment: &str) -> bool {
        match &self.kind {
            StepKind::Literal(text) => {
                if self.flags.intersects(PatternFlag::IGNORE_CASE) {
                    segment.eq_ignore_ascii_case(text)
                } else {
                    segment == text
                }
            }
            StepKind::Glob(components) => glob_matches(components, segment, self.flags),
        }
    }
}

/// One node in a compiled matcher chain.
///
/// Each node owns the rest of its chain, so a compiled pattern is a strict tree with no
/// cycles. `min_segments`/`max_segments` describe how many path segments the node and its
/// rest can consume in total and are fixed at compile time; they bound the greedy
/// backtracking and reject paths of impossible length early.
#[derive(Clone, Debug)]
enum PathMatcher {
    /// Matches only when no path segments remain.
    EndOfPath,

    /// Matches any remaining segments, including none. Compiled from a trailing `**`.
    Anything,

    /// A `**` with more pattern following it. Matching tries every possible number of
    /// segments consumed by the `**`, longest first.
    Greedy {
        min_segments: usize,
        next: Box<PathMatcher>,
    },

    /// A single-segment step followed by the rest of the chain.
    FixedStep {
        step: PatternStep,
        min_segments: usize,
        max_segments: usize,
        next: Box<PathMatcher>,
    },
}

impl PathMatcher {
    fn compile(parts: &[&str], start: usize, flags: PatternFlag) -> Self {
        if start >= parts.len() {
            return PathMatcher::EndOfPath;
        }

        let mut pos = start;
        while pos < parts.len() && parts[pos] == "**" {
            pos += 1;
        }

        if pos > start {
            if pos == parts.len() {
                // the `**` run consumes the rest of the pattern, nothing left to constrain
                return PathMatcher::Anything;
            }
            return Self::greedy(Self::compile(parts, pos, flags));
        }

        Self::fixed_step(
            PatternStep::new(parts[pos], flags),
            Self::compile(parts, pos + 1, flags),
        )
    }

    fn greedy(next: PathMatcher) -> Self {
        PathMatcher::Greedy {
            min_segments: next.min_segments(),
            next: Box::new(next),
        }
    }

    fn fixed_step(step: PatternStep, next: PathMatcher) -> Self {
        PathMatcher::FixedStep {
            step,
            min_segments: 1 + next.min_segments(),
            max_segments: next.max_segments().saturating_add(1),
            next: Box::new(next),
        }
    }

    /// The fewest path segments this chain can consume.
    fn min_segments(&self) -> usize {
        match self {
            PathMatcher::EndOfPath | PathMatcher::Anything => 0,
            PathMatcher::Greedy { min_segments, .. } => *min_segments,
            PathMatcher::FixedStep { min_segments, .. } => *min_segments,
        }
    }

    /// The most path segments this chain can consume, saturated at `usize::MAX`.
    fn max_segments(&self) -> usize {
        match self {
            PathMatcher::EndOfPath => 0,
            PathMatcher::Anything | PathMatcher::Greedy { .. } => usize::MAX,
            PathMatcher::FixedStep { max_segments, .. } => *max_segments,
        }
    }

    // Both queries keep the invariant `index <= segments.len()`.

    fn matches<S: AsRef<str>>(&self, segments: &[S], index: usize) -> bool {
        match self {
            PathMatcher::EndOfPath => index == segments.len(),
            PathMatcher::Anything => true,
            PathMatcher::Greedy { min_segments, next } => {
                let len = segments.len();
                if len - index < *min_segments {
                    return false;
                }

                // Let the `**` swallow as much as possible first and backtrack from there.
                let mut pos = len - min_segments;
                loop {
                    if next.matches(segments, pos) {
                        return true;
                    }
                    if pos == index {
                        return false;
                    }
                    pos -= 1;
                }
            }
            PathMatcher::FixedStep {
                step,
                min_segments,
                max_segments,
                next,
            } => {
                let remaining = segments.len() - index;
                remaining >= *min_segments
                    && remaining <= *max_segments
                    && step.matches(segments[index].as_ref())
                    && next.matches(segments, index + 1)
            }
        }
    }

    fn is_prefix<S: AsRef<str>>(&self, segments: &[S], index: usize) -> bool {
        match self {
            PathMatcher::EndOfPath => index == segments.len(),
            PathMatcher::Anything => true,
            // An unconsumed `**` can absorb segments that have not been seen yet, and any
            // rest-chain can be satisfied by some extension, so every path is a valid prefix.
            PathMatcher::Greedy { .. } => true,
            PathMatcher::FixedStep { step, next, .. } => {
                if index == segments.len() {
                    // ran out of real segments, the step may still match a future one
                    return true;
                }
                step.matches(segments[index].as_ref()) && next.is_prefix(segments, index + 1)
            }
        }
    }
}

/// An Ant-style path pattern, compiled once and reusable for any number of path tests.
///
/// The pattern text is split into segments on `/` and `\`. Within one segment `*`
/// matches any number of characters and `?` matches exactly one; a whole-segment `**`
/// matches any number of complete segments, including none. A trailing separator is
/// shorthand for appending `**`, so `foo/` selects `foo` and everything below it.
///
/// Compilation is total: any input string produces a valid pattern. A compiled pattern
/// is immutable and safe to share between threads.
#[derive(Clone, Debug)]
pub struct Pattern {
    /// Original pattern the user provided.
    pattern: String,

    /// Compiled matcher chain.
    matcher: PathMatcher,

    /// Flags used for the pattern.
    flags: PatternFlag,
}

impl Pattern {
    /// Compile a new pattern.
    pub fn new<T: AsRef<str>>(pattern: T, flags: PatternFlag) -> Self {
        Self::new_do(pattern.as_ref(), flags)
    }

    fn new_do(pattern: &str, flags: PatternFlag) -> Self {
        if pattern.is_empty() {
            // matches only the empty path
            return Self {
                pattern: String::new(),
                matcher: PathMatcher::EndOfPath,
                flags,
            };
        }

        // trailing / or \ assumes **
        let text = if pattern.ends_with(['/', '\\']) {
            let mut text = pattern.to_owned();
            text.push_str("**");
            text
        } else {
            pattern.to_owned()
        };

        let parts: Vec<&str> = text.split(['/', '\\']).collect();
        Self {
            pattern: pattern.to_owned(),
            matcher: PathMatcher::compile(&parts, 0, flags),
            flags,
        }
    }

    /// Get the original input pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Get the flags this pattern was compiled with.
    pub fn flags(&self) -> PatternFlag {
        self.flags
    }

    /// Check whether the given path segments fully match this pattern.
    pub fn matches<S: AsRef<str>>(&self, segments: &[S]) -> bool {
        self.matcher.matches(segments, 0)
    }

    /// Check whether the given path segments could be extended into a path that matches
    /// this pattern. A tree walker uses this to decide whether descending into a
    /// directory can still produce matches.
    ///
    /// A full match counts as a prefix match, but a mismatched step is a dead branch:
    /// no extension of the path can recover from it.
    pub fn is_prefix_of<S: AsRef<str>>(&self, segments: &[S]) -> bool {
        self.matcher.is_prefix(segments, 0)
    }
}

fn glob_matches(components: &[Component], text: &str, flags: PatternFlag) -> bool {
    match components.split_first() {
        None => text.is_empty(),
        Some((Component::Literal(literal), rest)) => match strip_literal(text, literal, flags) {
            Some(tail) => glob_matches(rest, tail, flags),
            None => false,
        },
        Some((Component::QuestionMark, rest)) => {
            let mut chars = text.chars();
            match chars.next() {
                Some(_) => glob_matches(rest, chars.as_str(), flags),
                None => false,
            }
        }
        Some((Component::Star, rest)) => {
            if rest.is_empty() {
                return true;
            }

            let mut text = text;
            loop {
                if glob_matches(rest, text, flags) {
                    return true;
                }

                let mut chars = text.chars();
                if chars.next().is_none() {
                    return false;
                }
                text = chars.as_str();
            }
        }
    }
}

fn strip_literal<'a>(text: &'a str, literal: &str, flags: PatternFlag) -> Option<&'a str> {
    if flags.intersects(PatternFlag::IGNORE_CASE) {
        // the literal was lowercased at compile time
        let mut chars = text.chars();
        for expected in literal.chars() {
            if !chars.next()?.eq_ignore_ascii_case(&expected) {
                return None;
            }
        }
        Some(chars.as_str())
    } else {
        text.strip_prefix(literal)
    }
}

#[test]
fn test_literal_patterns() {
    let pattern = Pattern::new("src/main/App.java", PatternFlag::empty());
    assert!(pattern.matches(&["src", "main", "App.java"]));
    assert!(!pattern.matches(&["src", "main"]));
    assert!(!pattern.matches(&["src", "main", "App.java", "extra"]));
    assert!(!pattern.matches(&["src", "main", "app.java"]));
    assert!(!pattern.matches(&["src", "other", "App.java"]));

    let pattern = Pattern::new("src/main/App.java", PatternFlag::IGNORE_CASE);
    assert!(pattern.matches(&["SRC", "Main", "app.JAVA"]));
    assert!(!pattern.matches(&["SRC", "Main", "app"]));
}

#[test]
fn test_empty_pattern() {
    let pattern = Pattern::new("", PatternFlag::empty());
    assert!(pattern.matches::<&str>(&[]));
    assert!(!pattern.matches(&["a"]));
    assert!(pattern.is_prefix_of::<&str>(&[]));
    assert!(!pattern.is_prefix_of(&["a"]));
}

#[test]
fn test_double_star() {
    let pattern = Pattern::new("**", PatternFlag::empty());
    assert!(pattern.matches::<&str>(&[]));
    assert!(pattern.matches(&["a"]));
    assert!(pattern.matches(&["a", "b", "c"]));
    assert!(pattern.is_prefix_of::<&str>(&[]));
    assert!(pattern.is_prefix_of(&["a", "b"]));

    // consecutive `**` collapse into one
    let pattern = Pattern::new("a/**/**/b", PatternFlag::empty());
    assert!(pattern.matches(&["a", "b"]));
    assert!(pattern.matches(&["a", "x", "b"]));
    assert!(pattern.matches(&["a", "x", "y", "b"]));
    assert!(!pattern.matches(&["a"]));
    assert!(!pattern.matches(&["a", "b", "c"]));
}

#[test]
fn test_greedy_backtracking() {
    let pattern = Pattern::new("a/**/b", PatternFlag::empty());
    assert!(pattern.matches(&["a", "b"]));
    assert!(pattern.matches(&["a", "x", "b"]));
    assert!(pattern.matches(&["a", "x", "y", "b"]));
    assert!(!pattern.matches(&["a", "b", "c"]));
    assert!(!pattern.matches(&["a"]));
    assert!(!pattern.matches(&["b"]));

    // the `**` may swallow segments that look like the next step
    let pattern = Pattern::new("**/b/c", PatternFlag::empty());
    assert!(pattern.matches(&["b", "c"]));
    assert!(pattern.matches(&["b", "b", "c"]));
    assert!(pattern.matches(&["x", "y", "b", "c"]));
    assert!(!pattern.matches(&["b", "c", "c"]));

    let pattern = Pattern::new("**/b/**/c", PatternFlag::empty());
    assert!(pattern.matches(&["b", "c"]));
    assert!(pattern.matches(&["x", "b", "y", "c"]));
    assert!(pattern.matches(&["b", "b", "c", "c"]));
    assert!(!pattern.matches(&["c", "b"]));
}

#[test]
fn test_segment_wildcards() {
    let pattern = Pattern::new("*.txt", PatternFlag::empty());
    assert!(pattern.matches(&["file.txt"]));
    assert!(pattern.matches(&[".txt"]));
    assert!(!pattern.matches(&["file.txt.bak"]));
    assert!(!pattern.matches(&["sub", "file.txt"]));

    let pattern = Pattern::new("file?", PatternFlag::empty());
    assert!(pattern.matches(&["file1"]));
    assert!(!pattern.matches(&["file"]));
    assert!(!pattern.matches(&["file12"]));

    let pattern = Pattern::new("a*b*c", PatternFlag::empty());
    assert!(pattern.matches(&["abc"]));
    assert!(pattern.matches(&["axxbxxc"]));
    assert!(pattern.matches(&["axxbxxbxxc"]));
    assert!(!pattern.matches(&["axxbxxcxx"]));
    assert!(!pattern.matches(&["xaxxbxxc"]));

    // `*` also matches zero characters, `?` exactly one
    let pattern = Pattern::new("*", PatternFlag::empty());
    assert!(pattern.matches(&[""]));
    assert!(pattern.matches(&["anything"]));
    assert!(!pattern.matches(&["a", "b"]));

    let pattern = Pattern::new("?", PatternFlag::empty());
    assert!(pattern.matches(&["ä"]));
    assert!(!pattern.matches(&["äh"]));
    assert!(!pattern.matches(&[""]));

    // in-segment `**` degrades to `*`
    let pattern = Pattern::new("a**b", PatternFlag::empty());
    assert!(pattern.matches(&["ab"]));
    assert!(pattern.matches(&["axxb"]));
    assert!(!pattern.matches(&["a", "b"]));
}

#[test]
fn test_case_sensitivity() {
    let pattern = Pattern::new("A*", PatternFlag::empty());
    assert!(pattern.matches(&["Abc"]));
    assert!(!pattern.matches(&["abc"]));

    let pattern = Pattern::new("A*", PatternFlag::IGNORE_CASE);
    assert!(pattern.matches(&["abc"]));
    assert!(pattern.matches(&["ABC"]));

    let pattern = Pattern::new("File?.txt", PatternFlag::IGNORE_CASE);
    assert!(pattern.matches(&["file1.TXT"]));
}

#[test]
fn test_trailing_separator() {
    let pattern = Pattern::new("foo/", PatternFlag::empty());
    assert!(pattern.matches(&["foo"]));
    assert!(pattern.matches(&["foo", "bar"]));
    assert!(pattern.matches(&["foo", "bar", "baz"]));
    assert!(!pattern.matches(&["bar"]));

    let pattern = Pattern::new("foo\\", PatternFlag::empty());
    assert!(pattern.matches(&["foo", "bar"]));

    let pattern = Pattern::new("a\\b/c", PatternFlag::empty());
    assert!(pattern.matches(&["a", "b", "c"]));
}

#[test]
fn test_empty_segments_preserved() {
    let pattern = Pattern::new("a//b", PatternFlag::empty());
    assert!(pattern.matches(&["a", "", "b"]));
    assert!(!pattern.matches(&["a", "b"]));

    let pattern = Pattern::new("/", PatternFlag::empty());
    assert!(pattern.matches(&[""]));
    assert!(!pattern.matches(&["a"]));
}

#[test]
fn test_prefix_matching() {
    // a path that ran out of segments can still lead to a match
    let pattern = Pattern::new("a/b/c", PatternFlag::empty());
    assert!(pattern.is_prefix_of::<&str>(&[]));
    assert!(pattern.is_prefix_of(&["a"]));
    assert!(pattern.is_prefix_of(&["a", "b"]));
    assert!(pattern.is_prefix_of(&["a", "b", "c"]));
    // a mismatched step is a dead branch, no extension can recover it
    assert!(!pattern.is_prefix_of(&["x"]));
    assert!(!pattern.is_prefix_of(&["a", "x"]));
    // once the chain is exhausted no further descent is valid
    assert!(!pattern.is_prefix_of(&["a", "b", "c", "d"]));

    // an unconsumed `**` keeps every door open
    let pattern = Pattern::new("**/z", PatternFlag::empty());
    assert!(pattern.is_prefix_of(&["a"]));
    assert!(pattern.is_prefix_of(&["a", "b"]));
    assert!(!pattern.matches(&["a", "b"]));

    let pattern = Pattern::new("a/**", PatternFlag::empty());
    assert!(pattern.is_prefix_of(&["a"]));
    assert!(pattern.matches(&["a"]));
    assert!(pattern.matches(&["a", "b"]));
    assert!(!pattern.is_prefix_of(&["b"]));
}

#[test]
fn test_compile_determinism() {
    let paths: &[&[&str]] = &[&[], &["a"], &["a", "b"], &["a", "x", "b"], &["x"]];
    for text in ["", "**", "a/**/b", "*.txt", "a//b", "foo/"] {
        let first = Pattern::new(text, PatternFlag::empty());
        let second = Pattern::new(text, PatternFlag::empty());
        for path in paths {
            assert_eq!(first.matches(path), second.matches(path), "pattern {text:?}");
            assert_eq!(
                first.is_prefix_of(path),
                second.is_prefix_of(path),
                "pattern {text:?}"
            );
        }
    }
}

#[test]
fn test_pattern_accessors() {
    let pattern = Pattern::new("docs/", PatternFlag::IGNORE_CASE);
    assert_eq!(pattern.pattern(), "docs/");
    assert_eq!(pattern.flags(), PatternFlag::IGNORE_CASE);
}
