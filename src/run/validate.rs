use colored::Colorize;

use crate::blueprint::FirstbootScript;
use crate::entity::pathpolicy::PathPolicies;
use crate::errors::BlueprintError;

pub(super) fn run(
    blueprint_file: &str,
    policies: &PathPolicies,
) -> Result<(), BlueprintError> {
    let start = std::time::Instant::now();

    let blueprint = super::load_blueprint(blueprint_file)?;
    let scripts = blueprint.validate(policies)?;

    if let Some(disk) = blueprint.disk() {
        for mnt in disk.mountpoints() {
            println!("{} {} ({})", "mount".cyan(), mnt.path, mnt.container);
        }
    }

    if let Some(iso) = blueprint.iso() {
        if !iso.volume_id.is_empty() {
            println!("{} volume id {}", "iso".cyan(), iso.volume_id);
        }
    }

    if let Some(sshd) = blueprint.sshd() {
        for (keyword, value) in sshd.options() {
            println!("{} {keyword} {value}", "sshd".cyan());
        }
    }

    for script in scripts {
        let (kind, name) = match &script {
            FirstbootScript::Custom(s) => ("custom", &s.common.name),
            FirstbootScript::Satellite(s) => ("satellite", &s.common.name),
            FirstbootScript::Aap(s) => ("aap", &s.common.name),
        };

        println!("{} {} {}", "firstboot".cyan(), kind, name);
    }

    println!(
        "{}",
        format!("{blueprint_file}: validation done in {:?}", start.elapsed()).green()
    );

    Ok(())
}
