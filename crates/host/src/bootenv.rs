//! Boot environments via `beadm`

use sysview_core::BootEnvironment;
use sysview_executor::CommandRunner;

use crate::{timestamp, HostError, HostResult};

/// Boot environments from `beadm list -H` (tab-separated machine output).
pub async fn list(runner: &CommandRunner) -> HostResult<Vec<BootEnvironment>> {
    let output = runner.output("beadm", &["list", "-H"]).await?;
    Ok(parse_listing(&output))
}

/// Create a boot environment and return the name that was used.
/// An empty name defaults to `be_<timestamp>`.
pub async fn create(runner: &CommandRunner, name: &str) -> HostResult<String> {
    let name = if name.trim().is_empty() {
        format!("be_{}", timestamp())
    } else {
        name.trim().to_string()
    };
    validate_name(&name)?;
    runner.output("beadm", &["create", &name]).await?;
    Ok(name)
}

fn validate_name(name: &str) -> HostResult<()> {
    if !name
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
    {
        return Err(HostError::InvalidArgument(
            "boot environment name contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

/// Rows are `name\tactive\tmountpoint\tspace\tcreated`; anything with
/// fewer fields is dropped.
fn parse_listing(output: &str) -> Vec<BootEnvironment> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.splitn(5, '\t');
            Some(BootEnvironment {
                name: fields.next()?.to_string(),
                active: fields.next()?.to_string(),
                mountpoint: fields.next()?.to_string(),
                space: fields.next()?.to_string(),
                created: fields.next()?.trim().to_string(),
            })
        })
        .filter(|be| !be.name.is_empty())
        .collect()
}
