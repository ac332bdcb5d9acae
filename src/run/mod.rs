pub mod policy;
pub mod validate;

use std::env;
use std::path::Path;

use tracing::debug;

use crate::blueprint::Blueprint;
use crate::entity::pathpolicy::PathPolicies;
use crate::errors::BlueprintError;
use crate::{
    cli,
    constants,
};

pub fn run(cli_args: cli::Cli) -> Result<(), BlueprintError> {
    let policies = load_policies(policy_location(cli_args.policy))?;

    match cli_args.commands {
        // Default is to validate
        None | Some(cli::Commands::Validate) => validate::run(&cli_args.blueprint, &policies),
        Some(cli::Commands::Policy) => {
            policy::run(&policies);
            Ok(())
        }
    }
}

/// `-p` wins over $BLUEPRINT_POLICY
fn policy_location(flag: Option<String>) -> Option<String> {
    flag.or_else(|| env::var(constants::ENV_BP_POLICY).ok())
        .filter(|file| !file.is_empty())
}

fn load_policies(
    location: Option<String>,
) -> Result<PathPolicies, BlueprintError> {
    let Some(policy_file) = location else {
        debug!("using default mountpoint policy");
        return Ok(PathPolicies::default_mountpoints());
    };

    debug!(file = %policy_file, "loading mountpoint policy");

    let policy_toml = std::fs::read_to_string(&policy_file)
        .map_err(|err| BlueprintError::ReadFile(err, policy_file))?;

    toml::from_str(&policy_toml).map_err(BlueprintError::Toml)
}

pub(crate) fn load_blueprint(
    blueprint_file: &str,
) -> Result<Blueprint, BlueprintError> {
    let text = std::fs::read_to_string(blueprint_file)
        .map_err(|err| BlueprintError::ReadFile(err, blueprint_file.to_string()))?;

    parse_blueprint(blueprint_file, &text)
}

/// Picks the decoder by file extension, TOML unless it says otherwise
fn parse_blueprint(
    blueprint_file: &str,
    text: &str,
) -> Result<Blueprint, BlueprintError> {
    let extension = Path::new(blueprint_file)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);

    debug!(file = blueprint_file, ?extension, "parsing blueprint");

    match extension.as_deref() {
        Some("json") => Blueprint::from_json(text),
        Some("yaml" | "yml") => Blueprint::from_yaml(text),
        _ => Blueprint::from_toml(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blueprint_by_extension() {
        struct Test {
            case: &'static str,
            file: &'static str,
            text: &'static str,
        }

        let tests = vec![
            Test {
                case: "toml",
                file: "./blueprint.toml",
                text: "name = \"bp\"\n[[customizations.disk.partitions]]\nmountpoint = \"/data\"\nfs_type = \"xfs\"\nminsize = \"1 GiB\"\n",
            },
            Test {
                case: "no extension defaults to toml",
                file: "blueprint",
                text: "name = \"bp\"\n[[customizations.disk.partitions]]\nmountpoint = \"/data\"\nfs_type = \"xfs\"\nminsize = \"1 GiB\"\n",
            },
            Test {
                case: "json",
                file: "/tmp/bp.JSON",
                text: r#"{"name": "bp", "customizations": {"disk": {"partitions": [{"mountpoint": "/data", "fs_type": "xfs", "minsize": "1 GiB"}]}}}"#,
            },
            Test {
                case: "yaml",
                file: "bp.yml",
                text: "name: bp\ncustomizations:\n  disk:\n    partitions:\n      - mountpoint: /data\n        fs_type: xfs\n        minsize: 1 GiB\n",
            },
        ];

        for test in tests {
            let bp = parse_blueprint(test.file, test.text).expect(test.case);
            let disk = bp.disk().expect(test.case);

            assert_eq!(bp.name, "bp", "unexpected name in case {}", test.case);
            assert_eq!(disk.partitions.len(), 1, "unexpected partitions in case {}", test.case);
            assert_eq!(
                disk.partitions[0].fs.mountpoint,
                "/data",
                "unexpected mountpoint in case {}",
                test.case
            );
        }
    }

    #[test]
    fn test_policy_flag_wins() {
        assert_eq!(
            policy_location(Some("strict.toml".to_string())),
            Some("strict.toml".to_string())
        );
    }

    #[test]
    fn test_default_policies() {
        let policies = load_policies(None).expect("default policy should load");
        assert_eq!(policies, PathPolicies::default_mountpoints());

        let err = load_policies(Some("/nonexistent/policy.toml".into()))
            .expect_err("expected missing policy file");
        assert!(matches!(err, BlueprintError::ReadFile(_, _)));
    }

    #[test]
    fn test_read_error_keeps_cause() {
        let dir = env::temp_dir();
        let dir = dir.to_string_lossy();

        for file in ["/nonexistent/blueprint.toml", dir.as_ref()] {
            let err = load_blueprint(file).expect_err("expected read error");

            match &err {
                BlueprintError::ReadFile(cause, name) => {
                    assert_eq!(name, file);
                    assert_eq!(err.to_string(), format!("cannot read file {file}: {cause}"));
                }
                other => panic!("expected read error for {file}, got {other}"),
            }
        }
    }
}
