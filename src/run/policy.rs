use colored::Colorize;

use crate::entity::pathpolicy::{PathPolicies, PathPolicy};

pub(super) fn run(policies: &PathPolicies) {
    for (path, policy) in policies.rules() {
        let policy = match policy {
            PathPolicy::Allow => "allow".green(),
            PathPolicy::Exact => "exact".yellow(),
            PathPolicy::Deny => "deny".red(),
        };

        println!("{policy}\t{path}");
    }
}
