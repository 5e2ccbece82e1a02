//! Glob pattern compilation and matching
//!
//! Patterns use glob syntax with gitignore-style placement rules:
//!
//! - `*` and `?` never cross a `/`; `**` spans any number of segments
//! - a leading `/` anchors the pattern to the scan root
//! - a trailing `/` restricts the pattern to directories
//! - a pattern without an interior `/` matches a single segment at any depth
//! - an anchored pattern matches the whole path or any of its parent directories

use std::fmt;

use glob::{MatchOptions, Pattern};

use crate::error::{PackError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled predicate over root-relative, `/`-separated paths.
pub trait PathMatcher: Send + Sync + fmt::Debug {
    fn is_match(&self, path: &str) -> bool;
}

/// Turns pattern strings into matchers.
pub trait PatternCompiler: Send + Sync {
    /// Compile a pattern. Fails only on malformed syntax.
    fn compile(&self, pattern: &str) -> Result<Box<dyn PathMatcher>>;
}

/// Compiles patterns with the `glob` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobCompiler;

impl PatternCompiler for GlobCompiler {
    fn compile(&self, pattern: &str) -> Result<Box<dyn PathMatcher>> {
        Ok(Box::new(CompiledPattern::new(pattern)?))
    }
}

#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    glob: Pattern,
    anchored: bool,
    dir_only: bool,
}

impl CompiledPattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let mut body = pattern.strip_prefix("./").unwrap_or(pattern);

        let dir_only = body.len() > 1 && body.ends_with('/');
        if dir_only {
            body = body.trim_end_matches('/');
        }

        let (body, rooted) = match body.strip_prefix('/') {
            Some(rest) => (rest, true),
            None => (body, false),
        };
        let anchored = rooted || body.contains('/');

        let glob =
            Pattern::new(&collapse_stars(body)).map_err(|source| PackError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            source: pattern.to_string(),
            glob,
            anchored,
            dir_only,
        })
    }

    /// The pattern as it was written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, path: &str) -> bool {
        if self.anchored {
            let mut prefixes: Vec<&str> = path.match_indices('/').map(|(i, _)| &path[..i]).collect();
            if !self.dir_only {
                prefixes.push(path);
            }
            prefixes
                .into_iter()
                .any(|p| self.glob.matches_with(p, MATCH_OPTIONS))
        } else {
            let mut segments: Vec<&str> = path.split('/').collect();
            if self.dir_only {
                segments.pop();
            }
            segments
                .into_iter()
                .any(|s| self.glob.matches_with(s, MATCH_OPTIONS))
        }
    }
}

/// `**` only spans directories as a whole segment. Any other run of `*`
/// behaves like a single `*`.
fn collapse_stars(body: &str) -> String {
    body.split('/')
        .map(|segment| {
            if segment == "**" {
                return segment.to_string();
            }
            let mut collapsed = String::with_capacity(segment.len());
            let mut after_star = false;
            for ch in segment.chars() {
                if ch == '*' && after_star {
                    continue;
                }
                after_star = ch == '*';
                collapsed.push(ch);
            }
            collapsed
        })
        .collect::<Vec<_>>()
        .join("/")
}

impl PathMatcher for CompiledPattern {
    fn is_match(&self, path: &str) -> bool {
        self.matches(path)
    }
}

/// An ordered union of compiled patterns.
#[derive(Debug, Default)]
pub struct PatternSet {
    patterns: Vec<Box<dyn PathMatcher>>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every pattern, failing on the first malformed one.
    pub fn compile<I, S>(compiler: &dyn PatternCompiler, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| compiler.compile(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn push(&mut self, matcher: Box<dyn PathMatcher>) {
        self.patterns.push(matcher);
    }

    /// True if any member matches.
    pub fn is_match(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(path))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, path: &str) -> bool {
        CompiledPattern::new(pattern).unwrap().matches(path)
    }

    #[test]
    fn test_star_stays_within_segment() {
        assert!(matches("src/*.rs", "src/main.rs"));
        assert!(!matches("src/*.rs", "src/nested/main.rs"));
        assert!(matches("*.log", "app.log"));
        assert!(!matches("*.log", "app.txt"));
    }

    #[test]
    fn test_double_star_spans_segments() {
        assert!(matches("src/**/*.rs", "src/main.rs"));
        assert!(matches("src/**/*.rs", "src/a/b/c.rs"));
        assert!(matches("**/*.min.js", "dist/app.min.js"));
        assert!(matches("node_modules/**", "node_modules/pkg/index.js"));
    }

    #[test]
    fn test_character_classes() {
        assert!(matches("[abc].txt", "a.txt"));
        assert!(!matches("[abc].txt", "d.txt"));
        assert!(matches("file[0-9].md", "docs/file7.md"));
        assert!(matches("test?.rs", "test1.rs"));
        assert!(!matches("test?.rs", "test12.rs"));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(matches("README.md", "README.md"));
        assert!(!matches("README.md", "readme.md"));
        assert!(!matches("[a-z].txt", "X.txt"));
    }

    #[test]
    fn test_unanchored_matches_any_depth() {
        assert!(matches("*.log", "logs/2024/app.log"));
        assert!(matches(".env", "config/.env"));
        assert!(matches("node_modules", "web/node_modules/react/index.js"));
    }

    #[test]
    fn test_leading_slash_anchors_to_root() {
        assert!(matches("/build", "build/out.js"));
        assert!(!matches("/build", "web/build/out.js"));
        assert!(matches("/TODO.md", "TODO.md"));
        assert!(!matches("/TODO.md", "docs/TODO.md"));
    }

    #[test]
    fn test_anchored_matches_parent_directories() {
        assert!(matches("src/generated", "src/generated/schema.rs"));
        assert!(!matches("src/generated", "lib/src/generated/schema.rs"));
    }

    #[test]
    fn test_trailing_slash_matches_directories_only() {
        assert!(matches("dist/", "dist/app.js"));
        assert!(matches("dist/", "packages/ui/dist/app.js"));
        assert!(!matches("dist/", "dist"));
        assert!(!matches("logs/", "logs"));
    }

    #[test]
    fn test_dot_slash_prefix_is_stripped() {
        assert!(matches("./src/main.rs", "src/main.rs"));
    }

    #[test]
    fn test_leading_dots_match_wildcards() {
        assert!(matches("*", ".hidden"));
        assert!(matches(".env*", ".env.local"));
    }

    #[test]
    fn test_malformed_pattern_is_rejected() {
        let err = CompiledPattern::new("[abc").unwrap_err();
        assert!(matches!(err, PackError::InvalidPattern { ref pattern, .. } if pattern == "[abc"));
    }

    #[test]
    fn test_stars_outside_whole_segment_act_as_single_star() {
        assert!(matches("build**", "build"));
        assert!(matches("build**", "web/build-cache/a.js"));
        assert!(!matches("build**", "src/main.rs"));
        assert!(matches("**.log", "logs/app.log"));
        assert!(matches("foo/**bar", "foo/sidebar"));
        assert!(!matches("foo/**bar", "foo/a/bar"));
        assert!(matches("a***b", "axyzb"));
        assert!(matches("src/***/*.rs", "src/lib/mod.rs"));
    }

    #[test]
    fn test_collapse_stars() {
        assert_eq!(collapse_stars("**/a/**"), "**/a/**");
        assert_eq!(collapse_stars("a***b"), "a*b");
        assert_eq!(collapse_stars("x/**y/***"), "x/*y/*");
        assert_eq!(collapse_stars("plain.txt"), "plain.txt");
    }

    #[test]
    fn test_glob_compiler() {
        let matcher = GlobCompiler.compile("*.rs").unwrap();
        assert!(matcher.is_match("lib.rs"));
        assert!(GlobCompiler.compile("[").is_err());
    }

    #[test]
    fn test_pattern_set_is_union() {
        let set = PatternSet::compile(&GlobCompiler, ["*.log", "tmp/"]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.is_match("server.log"));
        assert!(set.is_match("tmp/cache.bin"));
        assert!(!set.is_match("src/main.rs"));
    }

    #[test]
    fn test_pattern_set_empty_matches_nothing() {
        let set = PatternSet::new();
        assert!(set.is_empty());
        assert!(!set.is_match("anything"));
    }

    #[test]
    fn test_pattern_set_fails_on_first_malformed() {
        let err = PatternSet::compile(&GlobCompiler, ["*.rs", "[oops", "*.md"]).unwrap_err();
        assert!(err.to_string().contains("[oops"));
    }

    #[test]
    fn test_matching_is_pure() {
        let pattern = CompiledPattern::new("**/*.tmp").unwrap();
        let first = pattern.matches("a/b.tmp");
        let second = pattern.matches("a/b.tmp");
        assert_eq!(first, second);
        assert!(first);
    }
}
