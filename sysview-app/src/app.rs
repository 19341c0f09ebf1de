use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use sysview_core::{BootEnvironment, Package, ProcessRow, Snapshot, SystemProperty};
use sysview_executor::{CommandRunner, ShellRunner};
use sysview_host::process::ProcessMonitor;
use sysview_host::{bootenv, hardware, logs, pkg, process, zfs};

use crate::config::Config;
use crate::settings::SettingsStore;

/// The seven panel tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    System,
    Processes,
    Settings,
    Applications,
    Snapshots,
    BootEnvironments,
    Logs,
}

impl Tab {
    pub const ALL: [Tab; 7] = [
        Tab::System,
        Tab::Processes,
        Tab::Settings,
        Tab::Applications,
        Tab::Snapshots,
        Tab::BootEnvironments,
        Tab::Logs,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::System => "System",
            Tab::Processes => "Processes",
            Tab::Settings => "Settings",
            Tab::Applications => "Applications",
            Tab::Snapshots => "ZFS Snapshots",
            Tab::BootEnvironments => "Boot Environments",
            Tab::Logs => "Logs",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }
}

/// Which text field an edit session is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    SettingCommand,
    SnapshotName,
    BootEnvName,
}

#[derive(Debug, Clone)]
pub struct EditState {
    pub target: EditTarget,
    pub buffer: String,
}

/// A pending yes/no dialog.
#[derive(Debug, Clone)]
pub enum Confirm {
    Uninstall(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSource {
    Dmesg,
    Syslog,
}

pub struct App {
    pub config: Config,
    pub runner: CommandRunner,
    pub shell: ShellRunner,
    pub monitor: ProcessMonitor,
    pub settings: SettingsStore,

    pub tab: Tab,
    pub should_quit: bool,
    pub status: Option<String>,
    pub editing: Option<EditState>,
    pub confirm: Option<Confirm>,

    pub system_props: Vec<SystemProperty>,

    pub processes: Vec<ProcessRow>,
    pub process_selected: usize,

    pub setting_selected: usize,
    pub setting_outputs: Vec<String>,

    pub packages: Vec<Package>,
    pub package_selected: usize,

    pub pools: Vec<String>,
    pub pool_selected: usize,
    pub snapshots: Vec<Snapshot>,
    pub snapshot_name: String,

    pub bootenvs: Vec<BootEnvironment>,
    pub bootenv_name: String,

    pub log_text: String,
    pub log_scroll: u16,
    pub log_source: Option<LogSource>,
}

impl App {
    pub fn new(config: Config, settings: SettingsStore) -> Self {
        let timeout = Duration::from_secs(config.command_timeout_secs);
        let outputs = vec![String::new(); settings.entries.len()];
        Self {
            runner: CommandRunner::new(timeout),
            shell: ShellRunner::new(timeout),
            monitor: ProcessMonitor::new(),
            settings,
            config,
            tab: Tab::System,
            should_quit: false,
            status: None,
            editing: None,
            confirm: None,
            system_props: Vec::new(),
            processes: Vec::new(),
            process_selected: 0,
            setting_selected: 0,
            setting_outputs: outputs,
            packages: Vec::new(),
            package_selected: 0,
            pools: Vec::new(),
            pool_selected: 0,
            snapshots: Vec::new(),
            snapshot_name: String::new(),
            bootenvs: Vec::new(),
            bootenv_name: String::new(),
            log_text: String::new(),
            log_scroll: 0,
            log_source: None,
        }
    }

    /// One-time startup loads: the System tab rows, the first process
    /// snapshot, the installed packages and the ZFS pool list.
    pub async fn init(&mut self) {
        self.system_props = hardware::system_properties(&self.runner).await;
        self.processes = self.monitor.snapshot();
        match pkg::installed(&self.runner).await {
            Ok(packages) => self.packages = packages,
            Err(e) => self.fail("pkg info", e),
        }
        match zfs::pools(&self.runner).await {
            Ok(pools) => self.pools = pools,
            Err(e) => self.fail("zpool list", e),
        }
    }

    /// Periodic refresh. Only the visible tab is updated, and only the
    /// process table refreshes on a timer.
    pub fn on_tick(&mut self) {
        if self.tab == Tab::Processes {
            self.refresh_processes();
        }
    }

    pub async fn on_key(&mut self, key: KeyEvent) {
        self.status = None;

        if self.confirm.is_some() {
            self.on_confirm_key(key).await;
            return;
        }
        if self.editing.is_some() {
            self.on_edit_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.tab = Tab::ALL[(self.tab.index() + 1) % Tab::ALL.len()];
                return;
            }
            KeyCode::BackTab => {
                self.tab =
                    Tab::ALL[(self.tab.index() + Tab::ALL.len() - 1) % Tab::ALL.len()];
                return;
            }
            KeyCode::Char(c @ '1'..='7') => {
                self.tab = Tab::ALL[c as usize - '1' as usize];
                return;
            }
            _ => {}
        }

        match self.tab {
            Tab::System => self.on_system_key(key).await,
            Tab::Processes => self.on_process_key(key).await,
            Tab::Settings => self.on_setting_key(key).await,
            Tab::Applications => self.on_application_key(key).await,
            Tab::Snapshots => self.on_snapshot_key(key).await,
            Tab::BootEnvironments => self.on_bootenv_key(key).await,
            Tab::Logs => self.on_log_key(key).await,
        }
    }

    async fn on_confirm_key(&mut self, key: KeyEvent) {
        let Some(confirm) = self.confirm.take() else {
            return;
        };
        match (confirm, key.code) {
            (Confirm::Uninstall(name), KeyCode::Char('y') | KeyCode::Char('Y')) => {
                match pkg::uninstall(&self.runner, &name).await {
                    Ok(()) => {
                        self.set_status(format!("Uninstalled {name}"));
                        self.reload_packages().await;
                    }
                    Err(e) => self.fail(&format!("pkg delete {name}"), e),
                }
            }
            _ => self.set_status("Uninstall cancelled"),
        }
    }

    fn on_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.editing = None;
            }
            KeyCode::Enter => {
                let Some(edit) = self.editing.take() else {
                    return;
                };
                match edit.target {
                    EditTarget::SettingCommand => {
                        if let Some(entry) =
                            self.settings.entries.get_mut(self.setting_selected)
                        {
                            entry.command = edit.buffer;
                        }
                    }
                    EditTarget::SnapshotName => self.snapshot_name = edit.buffer,
                    EditTarget::BootEnvName => self.bootenv_name = edit.buffer,
                }
            }
            KeyCode::Backspace => {
                if let Some(edit) = self.editing.as_mut() {
                    edit.buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(edit) = self.editing.as_mut() {
                    edit.buffer.push(c);
                }
            }
            _ => {}
        }
    }

    async fn on_system_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('r') {
            self.system_props = hardware::system_properties(&self.runner).await;
            self.set_status("System information rebuilt");
        }
    }

    async fn on_process_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => {
                self.process_selected = self.process_selected.saturating_sub(1);
            }
            KeyCode::Down => {
                self.process_selected = next_index(self.process_selected, self.processes.len());
            }
            KeyCode::Char('r') => self.refresh_processes(),
            KeyCode::Char('t') => {
                let Some(pid) = self.selected_pid() else {
                    return;
                };
                match process::terminate(&self.runner, pid).await {
                    Ok(()) => self.set_status(format!("Sent SIGTERM to PID {pid}")),
                    Err(e) => self.fail(&format!("terminate PID {pid}"), e),
                }
                self.refresh_processes();
            }
            KeyCode::Char('k') => {
                let Some(pid) = self.selected_pid() else {
                    return;
                };
                match self.monitor.kill_forceful(pid) {
                    Ok(()) => self.set_status(format!("Killed PID {pid}")),
                    Err(e) => self.fail(&format!("kill PID {pid}"), e),
                }
                self.refresh_processes();
            }
            _ => {}
        }
    }

    async fn on_setting_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => {
                self.setting_selected = self.setting_selected.saturating_sub(1);
            }
            KeyCode::Down => {
                self.setting_selected =
                    next_index(self.setting_selected, self.settings.entries.len());
            }
            KeyCode::Char('e') => {
                if let Some(entry) = self.settings.entries.get(self.setting_selected) {
                    self.editing = Some(EditState {
                        target: EditTarget::SettingCommand,
                        buffer: entry.command.clone(),
                    });
                }
            }
            KeyCode::Enter => self.run_selected_setting().await,
            _ => {}
        }
    }

    /// Run the selected settings command through `sh -c`, applying the sudo
    /// heuristic first. Whatever line actually ran replaces the record's
    /// command and the settings file is rewritten.
    async fn run_selected_setting(&mut self) {
        let index = self.setting_selected;
        let Some(entry) = self.settings.entries.get(index) else {
            return;
        };

        let line = ShellRunner::elevate_if_needed(&entry.command);
        let rendered = match self.shell.run(&line).await {
            Ok(output) => output.combined(),
            Err(e) => format!("Error: {e}"),
        };
        if let Some(slot) = self.setting_outputs.get_mut(index) {
            *slot = rendered;
        }

        if let Err(e) = self.settings.record_command(index, line) {
            self.fail("persist settings", e);
        }
    }

    async fn on_application_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => {
                self.package_selected = self.package_selected.saturating_sub(1);
            }
            KeyCode::Down => {
                self.package_selected = next_index(self.package_selected, self.packages.len());
            }
            KeyCode::Char('r') => self.reload_packages().await,
            KeyCode::Char('u') => match self.packages.get(self.package_selected) {
                Some(package) => {
                    self.confirm = Some(Confirm::Uninstall(package.name.clone()));
                }
                None => self.set_status("No application selected"),
            },
            _ => {}
        }
    }

    async fn on_snapshot_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('p') => {
                if self.pools.is_empty() {
                    match zfs::pools(&self.runner).await {
                        Ok(pools) => self.pools = pools,
                        Err(e) => self.fail("zpool list", e),
                    }
                } else {
                    self.pool_selected = (self.pool_selected + 1) % self.pools.len();
                }
            }
            KeyCode::Char('e') => {
                self.editing = Some(EditState {
                    target: EditTarget::SnapshotName,
                    buffer: self.snapshot_name.clone(),
                });
            }
            KeyCode::Char('s') => self.reload_snapshots().await,
            KeyCode::Char('c') => {
                let Some(pool) = self.selected_pool() else {
                    self.set_status("No ZFS pool selected");
                    return;
                };
                match zfs::create_snapshot(&self.runner, &pool, &self.snapshot_name).await {
                    Ok(spec) => {
                        self.set_status(format!("Created snapshot {spec}"));
                        self.snapshot_name.clear();
                        self.reload_snapshots().await;
                    }
                    Err(e) => self.fail("zfs snapshot", e),
                }
            }
            _ => {}
        }
    }

    async fn on_bootenv_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('e') => {
                self.editing = Some(EditState {
                    target: EditTarget::BootEnvName,
                    buffer: self.bootenv_name.clone(),
                });
            }
            KeyCode::Char('s') => self.reload_bootenvs().await,
            KeyCode::Char('c') => {
                match bootenv::create(&self.runner, &self.bootenv_name).await {
                    Ok(name) => {
                        self.set_status(format!("Created boot environment {name}"));
                        self.bootenv_name.clear();
                        self.reload_bootenvs().await;
                    }
                    Err(e) => self.fail("beadm create", e),
                }
            }
            _ => {}
        }
    }

    async fn on_log_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('d') => match logs::dmesg(&self.runner).await {
                Ok(text) => self.show_log(text, LogSource::Dmesg),
                Err(e) => self.fail("dmesg", e),
            },
            KeyCode::Char('s') => {
                match logs::syslog(&self.config.syslog_path).await {
                    Ok(text) => self.show_log(text, LogSource::Syslog),
                    Err(e) => self.fail("read syslog", e),
                }
            }
            KeyCode::Up => self.log_scroll = self.log_scroll.saturating_sub(1),
            KeyCode::Down => self.log_scroll = self.log_scroll.saturating_add(1),
            KeyCode::PageUp => self.log_scroll = self.log_scroll.saturating_sub(20),
            KeyCode::PageDown => self.log_scroll = self.log_scroll.saturating_add(20),
            _ => {}
        }
    }

    fn refresh_processes(&mut self) {
        self.processes = self.monitor.snapshot();
        if !self.processes.is_empty() {
            self.process_selected = self.process_selected.min(self.processes.len() - 1);
        } else {
            self.process_selected = 0;
        }
    }

    async fn reload_packages(&mut self) {
        match pkg::installed(&self.runner).await {
            Ok(packages) => {
                self.packages = packages;
                if !self.packages.is_empty() {
                    self.package_selected =
                        self.package_selected.min(self.packages.len() - 1);
                } else {
                    self.package_selected = 0;
                }
            }
            Err(e) => self.fail("pkg info", e),
        }
    }

    async fn reload_snapshots(&mut self) {
        let Some(pool) = self.selected_pool() else {
            self.set_status("No ZFS pool selected");
            return;
        };
        match zfs::snapshots(&self.runner, &pool).await {
            Ok(snapshots) => self.snapshots = snapshots,
            Err(e) => self.fail(&format!("zfs list -r {pool}"), e),
        }
    }

    async fn reload_bootenvs(&mut self) {
        match bootenv::list(&self.runner).await {
            Ok(envs) => self.bootenvs = envs,
            Err(e) => self.fail("beadm list", e),
        }
    }

    fn show_log(&mut self, text: String, source: LogSource) {
        self.log_text = text;
        self.log_source = Some(source);
        self.log_scroll = 0;
    }

    pub fn selected_pid(&self) -> Option<u32> {
        self.processes.get(self.process_selected).map(|p| p.pid)
    }

    pub fn selected_pool(&self) -> Option<String> {
        self.pools.get(self.pool_selected).cloned()
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    fn fail(&mut self, what: &str, err: impl std::fmt::Display) {
        tracing::warn!(what, error = %err, "operation failed");
        self.status = Some(format!("{what}: {err}"));
    }
}

fn next_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (current + 1).min(len - 1)
    }
}
