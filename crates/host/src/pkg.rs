//! Installed package listing and removal via `pkg`

use regex::Regex;
use sysview_core::Package;
use sysview_executor::CommandRunner;

use crate::{HostError, HostResult};

/// List installed packages with their one-line descriptions.
pub async fn installed(runner: &CommandRunner) -> HostResult<Vec<Package>> {
    let output = runner.output("pkg", &["info"]).await?;
    Ok(parse_listing(&output))
}

/// Remove a package without prompting (`pkg delete -y`).
///
/// The caller is expected to have confirmed with the user already.
pub async fn uninstall(runner: &CommandRunner, name: &str) -> HostResult<()> {
    validate_name(name)?;
    runner.output("pkg", &["delete", "-y", name]).await?;
    Ok(())
}

fn validate_name(name: &str) -> HostResult<()> {
    if name.is_empty() {
        return Err(HostError::InvalidArgument(
            "package name cannot be empty".to_string(),
        ));
    }
    if !name
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '+'))
    {
        return Err(HostError::InvalidArgument(
            "package name contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

/// Parse `pkg info` output: `name-version  description...` per line.
///
/// The version suffix (last dash followed by a digit) is stripped from the
/// display name. Lines without a name field are dropped.
fn parse_listing(output: &str) -> Vec<Package> {
    let version_re = Regex::new(r"-\d[0-9A-Za-z._,]*$").expect("static regex");

    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.splitn(2, char::is_whitespace);
            let name_version = parts.next()?.trim();
            if name_version.is_empty() {
                return None;
            }
            let description = parts.next().unwrap_or("").trim().to_string();
            let name = version_re.replace(name_version, "").to_string();
            Some(Package { name, description })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PKG_INFO_OUTPUT: &str = "\
bash-5.2.15                    GNU Project's Bourne Again SHell
gnome-terminal-3.44.1          Terminal component for the GNOME Desktop
pkg-1.19.1_1                   Package manager
zstd-1.5.5                     Fast real-time compression algorithm
";

    #[test]
    fn test_parse_listing_strips_versions() {
        let packages = parse_listing(PKG_INFO_OUTPUT);
        let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["bash", "gnome-terminal", "pkg", "zstd"]);
    }

    #[test]
    fn test_parse_listing_keeps_descriptions() {
        let packages = parse_listing(PKG_INFO_OUTPUT);
        assert_eq!(packages[0].description, "GNU Project's Bourne Again SHell");
        assert_eq!(packages[2].description, "Package manager");
    }

    #[test]
    fn test_parse_listing_drops_blank_lines() {
        let packages = parse_listing("\n\nbash-5.2.15  shell\n\n");
        assert_eq!(packages.len(), 1);
    }

    #[test]
    fn test_parse_listing_name_without_description() {
        let packages = parse_listing("orphan-1.0\n");
        assert_eq!(packages[0].name, "orphan");
        assert_eq!(packages[0].description, "");
    }

    #[test]
    fn test_validate_name_rejects_shell_metacharacters() {
        assert!(matches!(
            validate_name("bash; rm -rf /"),
            Err(HostError::InvalidArgument(_))
        ));
        assert!(validate_name("gnome-terminal").is_ok());
        assert!(validate_name("libstdc++").is_ok());
    }

    #[test]
    fn test_validate_name_rejects_empty() {
        assert!(matches!(
            validate_name(""),
            Err(HostError::InvalidArgument(_))
        ));
    }
}
