use std::io;

use is_terminal::IsTerminal;

/// Output settings shared by every command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiContext {
    pub json: bool,
    pub verbose: u8,
    /// stderr is a terminal, so progress can redraw in place
    pub live: bool,
}

impl UiContext {
    pub fn new(json: bool, verbose: u8) -> Self {
        Self::from_tty(json, verbose, io::stderr().is_terminal())
    }

    pub(crate) fn from_tty(json: bool, verbose: u8, is_tty: bool) -> Self {
        Self {
            json,
            verbose,
            live: is_tty && !json && !is_ci(|key| std::env::var_os(key).is_some()),
        }
    }
}

fn is_ci(has_env: impl Fn(&str) -> bool) -> bool {
    const KEYS: &[&str] = &[
        "CI",
        "GITHUB_ACTIONS",
        "JENKINS_HOME",
        "BUILDKITE",
        "CIRCLECI",
        "TRAVIS",
        "TEAMCITY_VERSION",
    ];
    KEYS.iter().any(|key| has_env(key))
}
