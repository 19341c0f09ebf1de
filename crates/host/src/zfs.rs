//! ZFS pools and snapshots

use sysview_core::Snapshot;
use sysview_executor::CommandRunner;

use crate::{timestamp, HostError, HostResult};

/// Pool names from `zpool list`.
pub async fn pools(runner: &CommandRunner) -> HostResult<Vec<String>> {
    let output = runner.output("zpool", &["list", "-H", "-o", "name"]).await?;
    Ok(output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Snapshots of every dataset under `pool`, with creation times.
pub async fn snapshots(runner: &CommandRunner, pool: &str) -> HostResult<Vec<Snapshot>> {
    validate_dataset(pool)?;
    let output = runner
        .output(
            "zfs",
            &["list", "-H", "-t", "snapshot", "-o", "name,creation", "-r", pool],
        )
        .await?;
    Ok(parse_listing(&output))
}

/// Create a snapshot and return the full spec that was created.
///
/// An empty name defaults to a timestamp. A name that already contains `@`
/// is taken as a complete `dataset@snapshot` spec; otherwise the selected
/// pool is prepended.
pub async fn create_snapshot(
    runner: &CommandRunner,
    pool: &str,
    name: &str,
) -> HostResult<String> {
    let spec = snapshot_spec(pool, name)?;
    runner.output("zfs", &["snapshot", &spec]).await?;
    Ok(spec)
}

fn snapshot_spec(pool: &str, name: &str) -> HostResult<String> {
    validate_dataset(pool)?;
    let name = name.trim();
    if name.is_empty() {
        return Ok(format!("{pool}@{}", timestamp()));
    }
    if let Some((dataset, snap)) = name.split_once('@') {
        validate_dataset(dataset)?;
        validate_component(snap)?;
        return Ok(name.to_string());
    }
    validate_component(name)?;
    Ok(format!("{pool}@{name}"))
}

fn validate_dataset(dataset: &str) -> HostResult<()> {
    if dataset.is_empty() {
        return Err(HostError::InvalidArgument(
            "dataset name cannot be empty".to_string(),
        ));
    }
    if !dataset
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | ':' | '/'))
    {
        return Err(HostError::InvalidArgument(
            "dataset name contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_component(name: &str) -> HostResult<()> {
    if name.is_empty() {
        return Err(HostError::InvalidArgument(
            "snapshot name cannot be empty".to_string(),
        ));
    }
    if !name
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | ':'))
    {
        return Err(HostError::InvalidArgument(
            "snapshot name contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

/// Parse tab-separated `zfs list -H -o name,creation` output.
/// Lines without both fields are dropped.
fn parse_listing(output: &str) -> Vec<Snapshot> {
    output
        .lines()
        .filter_map(|line| {
            let (name, created) = line.split_once('\t')?;
            if name.is_empty() {
                return None;
            }
            Some(Snapshot {
                name: name.to_string(),
                created: created.trim().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZFS_LIST_OUTPUT: &str = "\
zroot@install\tMon Feb  5 14:02 2024
zroot/ROOT/default@pre-upgrade\tTue Mar 12 09:30 2024
zroot/usr/home@backup\tWed Apr 10 22:15 2024
";

    #[test]
    fn test_parse_listing_splits_on_tab() {
        let snapshots = parse_listing(ZFS_LIST_OUTPUT);
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[0].name, "zroot@install");
        assert_eq!(snapshots[0].created, "Mon Feb  5 14:02 2024");
        assert_eq!(snapshots[1].name, "zroot/ROOT/default@pre-upgrade");
    }

    #[test]
    fn test_parse_listing_drops_malformed_lines() {
        let snapshots = parse_listing("no-tab-here\nzroot@ok\tnow\n");
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].name, "zroot@ok");
    }

    #[test]
    fn test_snapshot_spec_prepends_pool() {
        assert_eq!(snapshot_spec("zroot", "nightly").unwrap(), "zroot@nightly");
    }

    #[test]
    fn test_snapshot_spec_accepts_full_spec() {
        assert_eq!(
            snapshot_spec("zroot", "zroot/usr/home@manual").unwrap(),
            "zroot/usr/home@manual"
        );
    }

    #[test]
    fn test_snapshot_spec_defaults_to_timestamp() {
        let spec = snapshot_spec("zroot", "").unwrap();
        let (pool, snap) = spec.split_once('@').unwrap();
        assert_eq!(pool, "zroot");
        assert_eq!(snap.len(), "20240101_120000".len());
    }

    #[test]
    fn test_snapshot_spec_rejects_metacharacters() {
        assert!(snapshot_spec("zroot", "bad name").is_err());
        assert!(snapshot_spec("zroot", "bad;name").is_err());
        assert!(snapshot_spec("zro ot", "ok").is_err());
    }
}
