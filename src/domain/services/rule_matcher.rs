//! Rule Matcher
//!
//! Selects the rules that apply to a file or to a whole workspace. Rules are
//! evaluated in declaration order and every matching rule is returned; a
//! file may deploy to several destinations.

use std::path::{Path, PathBuf};

use crate::domain::entities::{ResolvedRule, TargetRoot};

use super::path_resolver::{path_starts_with, strip_path_prefix};

/// Rules that apply to the absolute `file` path.
///
/// A rule applies when the file lies under the rule's resolved source and
/// passes its include/exclude filter. Anything else is out of scope.
pub fn rules_for_file<'a>(rules: &'a [ResolvedRule], file: &Path) -> Vec<&'a ResolvedRule> {
    rules
        .iter()
        .filter(|rule| match strip_path_prefix(file, rule.source()) {
            Some(relative) => rule.filter().matches(file, Some(&relative)),
            None => false,
        })
        .collect()
}

/// Rules eligible for a workspace-wide deploy.
///
/// Only rules whose source is the workspace root or one of its ancestors
/// qualify.
pub fn rules_for_workspace<'a>(
    rules: &'a [ResolvedRule],
    workspace_root: &Path,
) -> Vec<&'a ResolvedRule> {
    rules
        .iter()
        .filter(|rule| path_starts_with(workspace_root, rule.source()))
        .collect()
}

/// Local target roots of `rules`. Files under them are deploy output.
pub fn local_target_roots(rules: &[ResolvedRule]) -> Vec<PathBuf> {
    rules
        .iter()
        .filter_map(|rule| match rule.target() {
            TargetRoot::Local(path) => Some(path.clone()),
            TargetRoot::Remote { .. } => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{DeployRule, RemoteTarget};
    use crate::domain::services::resolve_rules;
    use crate::domain::value_objects::GlobFilter;

    fn js_rule() -> DeployRule {
        DeployRule::new("/ws/src", "/out")
            .unwrap()
            .with_filter(GlobFilter::new("**/*.js", "**/*.min.js").unwrap())
    }

    fn resolved(rules: Vec<DeployRule>) -> Vec<ResolvedRule> {
        resolve_rules(&rules, Path::new("/ws"))
    }

    #[test]
    fn empty_rules_yield_empty_result() {
        let rules: Vec<ResolvedRule> = Vec::new();
        assert!(rules_for_file(&rules, Path::new("/ws/src/app.js")).is_empty());
        assert!(rules_for_workspace(&rules, Path::new("/ws")).is_empty());
    }

    #[test]
    fn matching_file_under_source() {
        let rules = resolved(vec![js_rule()]);
        assert_eq!(rules_for_file(&rules, Path::new("/ws/src/app.js")).len(), 1);
    }

    #[test]
    fn exclude_wins() {
        let rules = resolved(vec![js_rule()]);
        assert!(rules_for_file(&rules, Path::new("/ws/src/lib/app.min.js")).is_empty());
    }

    #[test]
    fn source_prefix_mismatch_is_out_of_scope() {
        let rules = resolved(vec![js_rule()]);
        assert!(rules_for_file(&rules, Path::new("/ws/other/app.js")).is_empty());
    }

    #[test]
    fn all_matching_rules_fire_in_declaration_order() {
        let rules = resolved(vec![
            DeployRule::new("/ws/src", "/out/a").unwrap(),
            DeployRule::new("/ws/lib", "/out/b").unwrap(),
            DeployRule::new("/ws", "/out/c").unwrap(),
        ]);
        let matched = rules_for_file(&rules, Path::new("/ws/src/app.js"));
        let indices: Vec<usize> = matched.iter().map(|r| r.index()).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn relative_include_is_matched_against_source_relative_path() {
        let rule = DeployRule::new("src", "/out")
            .unwrap()
            .with_filter(GlobFilter::new("lib/*.js", "").unwrap());
        let rules = resolved(vec![rule]);
        assert_eq!(rules_for_file(&rules, Path::new("/ws/src/lib/app.js")).len(), 1);
        assert!(rules_for_file(&rules, Path::new("/ws/src/app.js")).is_empty());
    }

    #[test]
    fn workspace_rules_need_source_covering_root() {
        let rules = resolved(vec![
            DeployRule::new("/ws", "/out/a").unwrap(),
            DeployRule::new("/", "/out/b").unwrap(),
            DeployRule::new("/ws/src", "/out/c").unwrap(),
            DeployRule::new("/elsewhere", "/out/d").unwrap(),
        ]);
        let matched = rules_for_workspace(&rules, Path::new("/ws"));
        let indices: Vec<usize> = matched.iter().map(|r| r.index()).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn sub_source_rule_still_matches_single_files() {
        let rules = resolved(vec![DeployRule::new("/ws/src", "/out").unwrap()]);
        assert!(rules_for_workspace(&rules, Path::new("/ws")).is_empty());
        assert_eq!(rules_for_file(&rules, Path::new("/ws/src/a.txt")).len(), 1);
    }

    #[test]
    fn local_target_roots_skip_remote_rules() {
        let rules = resolved(vec![
            DeployRule::new("/ws", "dist").unwrap(),
            DeployRule::new("/ws", "/srv/www")
                .unwrap()
                .with_remote(RemoteTarget::new("example.org", "deploy"))
                .unwrap(),
        ]);
        assert_eq!(local_target_roots(&rules), vec![PathBuf::from("/ws/dist")]);
    }
}
