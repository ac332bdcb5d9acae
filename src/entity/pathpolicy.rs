use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::path;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathPolicy {
    /// The path and everything below it may be used
    #[default]
    Allow,

    /// The path and everything below it is off limits
    Deny,

    /// Only the path itself may be used, not its subdirectories
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathViolation {
    #[error("must be absolute")]
    NotAbsolute,

    #[error("must be canonical")]
    NotCanonical,

    #[error("is not allowed")]
    NotAllowed,
}

/// Path prefix rules, keyed by path components.
/// The root `/` is allowed unless a rule for it says otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, PathPolicy>")]
pub struct PathPolicies {
    rules: BTreeMap<Vec<String>, PathPolicy>,
}

impl PathPolicies {
    pub fn new<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = (S, PathPolicy)>,
        S: AsRef<str>,
    {
        Self {
            rules: rules
                .into_iter()
                .map(|(p, policy)| (path::components(&path::clean(p.as_ref())), policy))
                .collect(),
        }
    }

    /// Mountpoints a customized image may carry by default
    pub fn default_mountpoints() -> Self {
        Self::new([
            ("/", PathPolicy::Exact),
            ("/boot", PathPolicy::Exact),
            ("/app", PathPolicy::Allow),
            ("/data", PathPolicy::Allow),
            ("/home", PathPolicy::Allow),
            ("/opt", PathPolicy::Allow),
            ("/srv", PathPolicy::Allow),
            ("/tmp", PathPolicy::Allow),
            ("/usr", PathPolicy::Allow),
            ("/var", PathPolicy::Allow),
            ("/var/run", PathPolicy::Deny),
            ("/var/lock", PathPolicy::Deny),
        ])
    }

    /// Finds the rule with the longest matching prefix of `components`,
    /// returning it with the number of components left unmatched.
    fn lookup(&self, components: &[String]) -> (PathPolicy, usize) {
        for n in (0..=components.len()).rev() {
            if let Some(policy) = self.rules.get(&components[..n]) {
                return (*policy, components.len() - n);
            }
        }

        (PathPolicy::Allow, components.len())
    }

    pub fn check(&self, fs_path: &str) -> Result<(), PathViolation> {
        if !fs_path.starts_with('/') {
            return Err(PathViolation::NotAbsolute);
        }

        if !path::is_canonical(fs_path) {
            return Err(PathViolation::NotCanonical);
        }

        match self.lookup(&path::components(fs_path)) {
            (PathPolicy::Deny, _) => Err(PathViolation::NotAllowed),
            (PathPolicy::Exact, left) if left > 0 => Err(PathViolation::NotAllowed),
            _ => Ok(()),
        }
    }

    /// Rules as (path, policy) pairs, sorted by path
    pub fn rules(&self) -> impl Iterator<Item = (String, PathPolicy)> + '_ {
        self.rules
            .iter()
            .map(|(components, policy)| (format!("/{}", components.join("/")), *policy))
    }
}

impl From<BTreeMap<String, PathPolicy>> for PathPolicies {
    fn from(rules: BTreeMap<String, PathPolicy>) -> Self {
        Self::new(rules)
    }
}
