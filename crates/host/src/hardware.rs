//! Hardware and OS information for the System tab

use regex::Regex;
use sysinfo::{Disks, System};
use sysview_core::SystemProperty;
use sysview_executor::CommandRunner;

use crate::HostResult;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// GPU description extracted from `pciconf -lv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuInfo {
    pub name: String,
    pub driver: Option<String>,
    pub vram: Option<String>,
}

/// Look up the display adapter via `pciconf -lv`.
///
/// A machine without a `vgapci` device (or with output we cannot read)
/// yields `Ok(None)`; only a failing or missing `pciconf` is an error.
pub async fn gpu(runner: &CommandRunner) -> HostResult<Option<GpuInfo>> {
    let output = runner.output("pciconf", &["-lv"]).await?;
    Ok(parse_gpu(&output))
}

/// Active network interfaces as `(name, inet address)` pairs.
///
/// Only `wlan*` and `em*` interfaces are reported, matching what the panel
/// considers "the" network devices of the machine.
pub async fn network_interfaces(runner: &CommandRunner) -> HostResult<Vec<(String, String)>> {
    let output = runner.output("ifconfig", &[]).await?;
    Ok(parse_interfaces(&output))
}

/// Build the full System tab row list.
///
/// Every source that is unavailable degrades to a `"Not available"` value
/// instead of failing the whole tab.
pub async fn system_properties(runner: &CommandRunner) -> Vec<SystemProperty> {
    let mut sys = System::new_all();
    sys.refresh_all();

    let mut props = Vec::new();

    props.push(SystemProperty::new(
        "Operating System",
        System::name().unwrap_or_else(|| "Not available".to_string()),
    ));
    props.push(SystemProperty::new(
        "OS Version",
        System::os_version().unwrap_or_else(|| "Not available".to_string()),
    ));

    match sys.cpus().first() {
        Some(cpu) => {
            props.push(SystemProperty::new("CPU Name", cpu.brand()));
            props.push(SystemProperty::new(
                "CPU Core Count",
                sys.physical_core_count()
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "Not available".to_string()),
            ));
            props.push(SystemProperty::new(
                "CPU Speed",
                format!("{} MHz", cpu.frequency()),
            ));
        }
        None => props.push(SystemProperty::new("CPU Information", "Not available")),
    }

    match gpu(runner).await {
        Ok(Some(info)) => {
            props.push(SystemProperty::new("GPU Name", info.name));
            props.push(SystemProperty::new(
                "GPU Driver",
                info.driver.unwrap_or_else(|| "Not available".to_string()),
            ));
            props.push(SystemProperty::new(
                "VRAM",
                info.vram.unwrap_or_else(|| "Not available".to_string()),
            ));
        }
        Ok(None) => props.push(SystemProperty::new("GPU Information", "Not available")),
        Err(e) => {
            tracing::warn!(error = %e, "pciconf lookup failed");
            props.push(SystemProperty::new("GPU Information", "Not available"));
        }
    }

    props.push(SystemProperty::new(
        "Available RAM",
        format!("{:.2} GB", sys.available_memory() as f64 / GIB),
    ));

    let disks = Disks::new_with_refreshed_list();
    match disks
        .iter()
        .find(|d| d.mount_point() == std::path::Path::new("/"))
    {
        Some(root) => {
            let total = root.total_space();
            let free = root.available_space();
            props.push(SystemProperty::new("Hard Drive Name", "/"));
            props.push(SystemProperty::new(
                "Total Space",
                format!("{:.2} GB", total as f64 / GIB),
            ));
            props.push(SystemProperty::new(
                "Used Space",
                format!("{:.2} GB", total.saturating_sub(free) as f64 / GIB),
            ));
            props.push(SystemProperty::new(
                "Free Space",
                format!("{:.2} GB", free as f64 / GIB),
            ));
        }
        None => props.push(SystemProperty::new("Root Filesystem", "Not available")),
    }

    match network_interfaces(runner).await {
        Ok(interfaces) => {
            for (iface, address) in interfaces {
                props.push(SystemProperty::new(iface, address));
            }
        }
        Err(e) => tracing::warn!(error = %e, "ifconfig lookup failed"),
    }

    props
}

/// Extract the `vgapci` device block and pull the three fields out of it.
fn parse_gpu(output: &str) -> Option<GpuInfo> {
    let header_re = Regex::new(r"^(?P<driver>[a-z]+)\d+@pci").expect("static regex");
    let device_re = Regex::new(r"device\s*=\s*'(?P<name>[^']+)'").expect("static regex");
    let memory_re = Regex::new(r"[Mm]emory\s*[:=]\s*(?P<vram>\S.*)").expect("static regex");

    let mut in_block = false;
    let mut driver = None;
    let mut name = None;
    let mut vram = None;

    for line in output.lines() {
        let is_header = !line.starts_with(char::is_whitespace);
        if is_header {
            if in_block {
                break;
            }
            if line.to_lowercase().contains("vgapci") {
                in_block = true;
                driver = header_re
                    .captures(line)
                    .map(|c| c["driver"].to_string());
            }
            continue;
        }
        if !in_block {
            continue;
        }
        if name.is_none() {
            if let Some(caps) = device_re.captures(line) {
                name = Some(caps["name"].to_string());
            }
        }
        if vram.is_none() {
            if let Some(caps) = memory_re.captures(line) {
                vram = Some(caps["vram"].trim().to_string());
            }
        }
    }

    name.map(|name| GpuInfo { name, driver, vram })
}

/// Pair `wlan*`/`em*` interface headers with the first `inet` line below.
fn parse_interfaces(output: &str) -> Vec<(String, String)> {
    let mut result = Vec::new();
    let mut current: Option<String> = None;

    for line in output.lines() {
        if !line.starts_with(char::is_whitespace) {
            let name = match line.split_whitespace().next() {
                Some(first) if first.ends_with(':') => first.trim_end_matches(':'),
                _ => continue,
            };
            current = (name.starts_with("wlan") || name.starts_with("em"))
                .then(|| name.to_string());
            continue;
        }

        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix("inet ") {
            if let (Some(iface), Some(address)) =
                (current.take(), rest.split_whitespace().next())
            {
                result.push((iface, address.to_string()));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const PCICONF_OUTPUT: &str = "\
hostb0@pci0:0:0:0:\tclass=0x060000 rev=0x09 hdr=0x00 vendor=0x8086 device=0x0154
    vendor     = 'Intel Corporation'
    device     = '3rd Gen Core processor DRAM Controller'
    class      = bridge
vgapci0@pci0:0:2:0:\tclass=0x030000 rev=0x09 hdr=0x00 vendor=0x8086 device=0x0166
    vendor     = 'Intel Corporation'
    device     = '3rd Gen Core processor Graphics Controller'
    class      = display
    subclass   = VGA
em0@pci0:2:0:0:\tclass=0x020000 rev=0x03 hdr=0x00 vendor=0x8086 device=0x1502
    vendor     = 'Intel Corporation'
    device     = '82579LM Gigabit Network Connection'
    class      = network
";

    const IFCONFIG_OUTPUT: &str = "\
em0: flags=8863<UP,BROADCAST,RUNNING,SIMPLEX,MULTICAST> metric 0 mtu 1500
\tether 00:11:22:33:44:55
\tinet 192.168.1.23 netmask 0xffffff00 broadcast 192.168.1.255
\tstatus: active
lo0: flags=8049<UP,LOOPBACK,RUNNING,MULTICAST> metric 0 mtu 16384
\tinet6 ::1 prefixlen 128
\tinet 127.0.0.1 netmask 0xff000000
wlan0: flags=8843<UP,BROADCAST,RUNNING,SIMPLEX,MULTICAST> metric 0 mtu 1500
\tinet 10.0.0.5 netmask 0xffffff00 broadcast 10.0.0.255
";

    #[test]
    fn test_parse_gpu_extracts_device_block() {
        let info = parse_gpu(PCICONF_OUTPUT).unwrap();
        assert_eq!(info.name, "3rd Gen Core processor Graphics Controller");
        assert_eq!(info.driver.as_deref(), Some("vgapci"));
        assert_eq!(info.vram, None);
    }

    #[test]
    fn test_parse_gpu_without_vga_device() {
        let output = "em0@pci0:2:0:0:\tclass=0x020000\n    device     = 'NIC'\n";
        assert_eq!(parse_gpu(output), None);
    }

    #[test]
    fn test_parse_gpu_stops_at_next_device() {
        // The NIC's device line must not overwrite the GPU name.
        let info = parse_gpu(PCICONF_OUTPUT).unwrap();
        assert_ne!(info.name, "82579LM Gigabit Network Connection");
    }

    #[test]
    fn test_parse_interfaces_keeps_wlan_and_em_only() {
        let interfaces = parse_interfaces(IFCONFIG_OUTPUT);
        assert_eq!(
            interfaces,
            vec![
                ("em0".to_string(), "192.168.1.23".to_string()),
                ("wlan0".to_string(), "10.0.0.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_interfaces_ignores_inet6() {
        let output = "wlan0: flags=8843<UP> metric 0 mtu 1500\n\tinet6 fe80::1 prefixlen 64\n";
        assert!(parse_interfaces(output).is_empty());
    }

    #[test]
    fn test_parse_interfaces_orphan_inet_line() {
        // An inet line with no interface header above is dropped, not paired.
        let output = "\tinet 10.1.1.1 netmask 0xffffff00\n";
        assert!(parse_interfaces(output).is_empty());
    }
}
