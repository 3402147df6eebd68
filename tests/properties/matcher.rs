//! Property tests for include/exclude filtering and rule matching.

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use fsdeploy::domain::entities::DeployRule;
use fsdeploy::domain::services::{resolve_rules, rules_for_file};
use fsdeploy::domain::value_objects::GlobFilter;

fn name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z]{1,8}\\.(js|css|html|md)").unwrap()
}

fn pattern() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("*.js".to_string()),
        Just("*.css".to_string()),
        Just("**/*.html".to_string()),
        Just("{a,b}*".to_string()),
        Just("?*.md".to_string()),
    ]
}

fn workspace() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\ws")
    } else {
        PathBuf::from("/ws")
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: when the exclude pattern matches, the include never rescues
    /// the file.
    #[test]
    fn property_exclude_wins(
        include in pattern(),
        exclude in pattern(),
        file in name(),
    ) {
        let path = workspace().join("src").join(&file);
        let with_exclude = GlobFilter::new(&include, &exclude).unwrap();
        let exclude_only = GlobFilter::new(&exclude, "").unwrap();

        if !exclude.is_empty() && exclude_only.matches(&path, Some(Path::new(&file))) {
            prop_assert!(!with_exclude.matches(&path, Some(Path::new(&file))));
        }
    }

    /// PROPERTY: blank patterns accept everything.
    #[test]
    fn property_blank_filter_matches_all(file in name()) {
        let path = workspace().join(&file);
        prop_assert!(GlobFilter::new("", "").unwrap().matches(&path, None));
    }

    /// PROPERTY: matched rules keep declaration order and all contain the file.
    #[test]
    fn property_matches_keep_declaration_order(
        sources in proptest::collection::vec(prop_oneof![Just("."), Just("src"), Just("lib")], 1..6),
        file in name(),
    ) {
        let rules: Vec<DeployRule> = sources
            .iter()
            .map(|s| DeployRule::new(*s, "/out").unwrap())
            .collect();
        let resolved = resolve_rules(&rules, &workspace());
        let path = workspace().join("src").join(&file);

        let matched = rules_for_file(&resolved, &path);
        let indices: Vec<usize> = matched.iter().map(|r| r.index()).collect();

        let mut sorted = indices.clone();
        sorted.sort_unstable();
        prop_assert_eq!(&indices, &sorted);

        let expected = sources.iter().filter(|s| **s != "lib").count();
        prop_assert_eq!(indices.len(), expected);
    }
}
