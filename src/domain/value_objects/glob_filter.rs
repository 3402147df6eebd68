//! Include/exclude glob pair
//!
//! An empty include matches everything, an empty exclude matches nothing,
//! and exclude always wins when both match. Patterns follow `globset`
//! semantics (`*`, `?`, `[...]`, `**`, `{a,b}`); `*` does not cross a
//! path separator.

use std::fmt;
use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};

use crate::domain::CASE_INSENSITIVE_PATHS;

/// Compiled include/exclude filter for one rule
#[derive(Clone)]
pub struct GlobFilter {
    include: Option<GlobMatcher>,
    exclude: Option<GlobMatcher>,
}

impl GlobFilter {
    /// Compile a filter from raw patterns. Blank patterns take their defaults.
    pub fn new(include: &str, exclude: &str) -> Result<Self, globset::Error> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// Filter that accepts every path.
    pub fn match_all() -> Self {
        Self {
            include: None,
            exclude: None,
        }
    }

    pub fn include_pattern(&self) -> &str {
        self.include.as_ref().map(|m| m.glob().glob()).unwrap_or("")
    }

    pub fn exclude_pattern(&self) -> &str {
        self.exclude.as_ref().map(|m| m.glob().glob()).unwrap_or("")
    }

    /// Check a file against the filter.
    ///
    /// The bare file name, the full path and (when given) the path relative
    /// to the rule's source are all tried; a hit on any of them counts.
    pub fn matches(&self, file: &Path, relative: Option<&Path>) -> bool {
        let name = file.file_name().map(Path::new);
        let candidates: Vec<&Path> = name
            .into_iter()
            .chain(std::iter::once(file))
            .chain(relative)
            .collect();

        let included = match &self.include {
            Some(matcher) => candidates.iter().any(|c| matcher.is_match(c)),
            None => true,
        };
        let excluded = match &self.exclude {
            Some(matcher) => candidates.iter().any(|c| matcher.is_match(c)),
            None => false,
        };

        included && !excluded
    }
}

fn compile(pattern: &str) -> Result<Option<GlobMatcher>, globset::Error> {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return Ok(None);
    }

    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .case_insensitive(CASE_INSENSITIVE_PATHS)
        .build()?;
    Ok(Some(glob.compile_matcher()))
}

impl Default for GlobFilter {
    fn default() -> Self {
        Self::match_all()
    }
}

impl PartialEq for GlobFilter {
    fn eq(&self, other: &Self) -> bool {
        self.include_pattern() == other.include_pattern()
            && self.exclude_pattern() == other.exclude_pattern()
    }
}

impl Eq for GlobFilter {}

impl fmt::Debug for GlobFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobFilter")
            .field("include", &self.include_pattern())
            .field("exclude", &self.exclude_pattern())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(include: &str, exclude: &str) -> GlobFilter {
        GlobFilter::new(include, exclude).unwrap()
    }

    #[test]
    fn empty_patterns_match_everything() {
        let f = filter("", "");
        assert!(f.matches(Path::new("/ws/src/anything.bin"), None));
    }

    #[test]
    fn include_matches_bare_file_name() {
        let f = filter("*.js", "");
        assert!(f.matches(Path::new("/ws/src/lib/app.js"), None));
        assert!(!f.matches(Path::new("/ws/src/lib/app.ts"), None));
    }

    #[test]
    fn include_matches_full_path_with_globstar() {
        let f = filter("**/lib/*.js", "");
        assert!(f.matches(Path::new("/ws/src/lib/app.js"), None));
        assert!(!f.matches(Path::new("/ws/src/app.js"), None));
    }

    #[test]
    fn exclude_wins_over_include() {
        let f = filter("**/*.js", "**/*.min.js");
        assert!(f.matches(Path::new("/ws/src/app.js"), None));
        assert!(!f.matches(Path::new("/ws/src/lib/app.min.js"), None));
    }

    #[test]
    fn relative_candidate_is_tried() {
        let f = filter("lib/*.js", "");
        let file = Path::new("/ws/src/lib/app.js");
        assert!(!f.matches(file, None));
        assert!(f.matches(file, Some(Path::new("lib/app.js"))));
    }

    #[test]
    fn brace_alternatives() {
        let f = filter("*.{html,css}", "");
        assert!(f.matches(Path::new("/ws/index.html"), None));
        assert!(f.matches(Path::new("/ws/site.css"), None));
        assert!(!f.matches(Path::new("/ws/app.js"), None));
    }

    #[test]
    fn blank_patterns_are_trimmed_to_defaults() {
        let f = filter("   ", "  ");
        assert_eq!(f.include_pattern(), "");
        assert_eq!(f.exclude_pattern(), "");
        assert_eq!(f, GlobFilter::match_all());
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(GlobFilter::new("[unclosed", "").is_err());
    }
}
