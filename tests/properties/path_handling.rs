//! Property tests for path resolution and destination computation.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use proptest::prelude::*;

use fsdeploy::domain::entities::{DeployRule, RemoteTarget};
use fsdeploy::domain::services::{
    compute_destination, normalize_path, resolve_absolute, resolve_rule, strip_path_prefix,
};
use fsdeploy::domain::value_objects::Destination;

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9_-]{1,12}").unwrap()
}

fn relative_path() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(segment(), 0..=4)
}

fn join(root: &Path, segments: &[String]) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in segments {
        path.push(segment);
    }
    path
}

fn workspace() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\ws")
    } else {
        PathBuf::from("/ws")
    }
}

fn out_root() -> PathBuf {
    if cfg!(windows) {
        PathBuf::from(r"C:\out")
    } else {
        PathBuf::from("/out")
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a local destination is the target root plus exactly the
    /// file's path below the source root.
    #[test]
    fn property_local_rerooting_is_lossless(
        source in relative_path(),
        sub in relative_path(),
        name in segment(),
    ) {
        let ws = workspace();
        let source_str = source.join("/");
        let rule = DeployRule::new(
            if source_str.is_empty() { "." } else { source_str.as_str() },
            out_root().display().to_string(),
        ).unwrap();
        let resolved = resolve_rule(0, &rule, &ws);

        let dir = join(&join(&ws, &source), &sub);
        let destination = compute_destination(&resolved, &dir, OsStr::new(&name)).unwrap();

        let expected = join(&join(&out_root(), &sub), std::slice::from_ref(&name));
        prop_assert_eq!(destination, Destination::Local(expected));
    }

    /// PROPERTY: remote destinations always use forward slashes.
    #[test]
    fn property_remote_destination_uses_forward_slashes(
        sub in relative_path(),
        name in segment(),
    ) {
        let ws = workspace();
        let rule = DeployRule::new("src", "/var/www")
            .unwrap()
            .with_remote(RemoteTarget::new("example.org", "deploy"))
            .unwrap();
        let resolved = resolve_rule(0, &rule, &ws);

        let dir = join(&ws.join("src"), &sub);
        let destination = compute_destination(&resolved, &dir, OsStr::new(&name)).unwrap();

        let mut expected = vec!["/var/www".to_string()];
        expected.extend(sub.iter().cloned());
        expected.push(name);
        prop_assert_eq!(destination, Destination::Remote(expected.join("/")));
    }

    /// PROPERTY: a directory outside the source is always rejected.
    #[test]
    fn property_outside_source_is_rejected(
        sub in relative_path(),
        name in segment(),
    ) {
        let ws = workspace();
        let rule = DeployRule::new("src", out_root().display().to_string()).unwrap();
        let resolved = resolve_rule(0, &rule, &ws);

        // `src2` shares a string prefix with `src` but not a component
        let dir = join(&ws.join("src2"), &sub);
        prop_assert!(compute_destination(&resolved, &dir, OsStr::new(&name)).is_err());
    }

    /// PROPERTY: stripping a prefix and joining it back restores the path.
    #[test]
    fn property_strip_prefix_round_trip(
        prefix in relative_path(),
        rest in relative_path(),
    ) {
        let base = join(&workspace(), &prefix);
        let path = join(&base, &rest);

        let stripped = strip_path_prefix(&path, &base).unwrap();
        prop_assert_eq!(base.join(stripped), path);
    }

    /// PROPERTY: resolution and normalization never panic.
    #[test]
    fn property_resolution_never_panics(s in "(?s).{0,128}") {
        let resolved = resolve_absolute(&workspace(), &s);
        let _ = normalize_path(&resolved);
    }

    /// PROPERTY: normalization is idempotent.
    #[test]
    fn property_normalize_is_idempotent(s in "[a-z./]{0,64}") {
        let once = normalize_path(Path::new(&s));
        prop_assert_eq!(normalize_path(&once), once);
    }
}
