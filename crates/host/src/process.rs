//! Process table and the two kill paths

use std::time::{Duration, Instant};

use sysinfo::{Pid, System};
use sysview_core::ProcessRow;
use sysview_executor::CommandRunner;

use crate::{HostError, HostResult};

/// How long the forceful path waits for the process to actually go away.
const KILL_WAIT: Duration = Duration::from_secs(5);

/// Owns the `sysinfo` handle so CPU percentages accumulate between ticks.
pub struct ProcessMonitor {
    sys: System,
}

impl ProcessMonitor {
    pub fn new() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();
        Self { sys }
    }

    /// Re-read the process table and return rows sorted ascending by PID.
    pub fn snapshot(&mut self) -> Vec<ProcessRow> {
        self.sys.refresh_processes();
        self.sys.refresh_memory();

        let total_memory = self.sys.total_memory().max(1);
        let mut rows: Vec<ProcessRow> = self
            .sys
            .processes()
            .iter()
            .map(|(pid, process)| ProcessRow {
                pid: pid.as_u32(),
                name: process.name().to_string(),
                cpu_percent: process.cpu_usage(),
                mem_percent: process.memory() as f32 / total_memory as f32 * 100.0,
                status: process.status().to_string(),
            })
            .collect();

        rows.sort_unstable_by_key(|row| row.pid);
        rows
    }

    /// Forceful path: SIGKILL through sysinfo, then wait up to five seconds
    /// for the process to disappear from the table.
    pub fn kill_forceful(&mut self, pid: u32) -> HostResult<()> {
        let pid = Pid::from_u32(pid);
        let process = self
            .sys
            .process(pid)
            .ok_or_else(|| HostError::NotFound(format!("no process with PID {pid}")))?;

        if !process.kill() {
            return Err(HostError::OperationFailed(format!(
                "kill signal could not be delivered to PID {pid}"
            )));
        }

        let deadline = Instant::now() + KILL_WAIT;
        while self.sys.refresh_process(pid) {
            if Instant::now() >= deadline {
                return Err(HostError::OperationFailed(format!(
                    "PID {pid} still running after {}s",
                    KILL_WAIT.as_secs()
                )));
            }
            std::thread::sleep(Duration::from_millis(100));
        }

        Ok(())
    }
}

impl Default for ProcessMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Graceful path: ask the process to exit via `kill -TERM`.
///
/// Independent of [`ProcessMonitor::kill_forceful`]; neither path checks
/// what the other did.
pub async fn terminate(runner: &CommandRunner, pid: u32) -> HostResult<()> {
    runner.output("kill", &["-TERM", &pid.to_string()]).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_sorted_by_pid() {
        let mut monitor = ProcessMonitor::new();
        let rows = monitor.snapshot();
        assert!(!rows.is_empty());
        assert!(rows.windows(2).all(|w| w[0].pid <= w[1].pid));
    }

    #[test]
    fn test_snapshot_memory_percent_bounded() {
        let mut monitor = ProcessMonitor::new();
        for row in monitor.snapshot() {
            assert!(row.mem_percent >= 0.0);
            assert!(row.mem_percent <= 100.0);
        }
    }

    #[test]
    fn test_kill_forceful_unknown_pid() {
        let mut monitor = ProcessMonitor::new();
        // PIDs wrap far below u32::MAX on any real system.
        let result = monitor.kill_forceful(u32::MAX - 1);
        assert!(matches!(result, Err(HostError::NotFound(_))));
    }
}
