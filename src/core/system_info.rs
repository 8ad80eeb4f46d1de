//! Host description printed above benchmark results

use std::fmt;
use std::sync::Mutex;

use sysinfo::System;

#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub os: String,
    pub cpu: String,
    pub logical_cores: usize,
    pub total_memory_mib: u64,
}

lazy_static::lazy_static! {
    static ref SYSTEM_INFO: Mutex<Option<SystemInfo>> = Mutex::new(None);
}

impl SystemInfo {
    /// Probe the host once; later calls return the cached value
    pub fn get() -> SystemInfo {
        let mut cached = match SYSTEM_INFO.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(ref info) = *cached {
            return info.clone();
        }
        let info = Self::probe();
        *cached = Some(info.clone());
        info
    }

    fn probe() -> SystemInfo {
        let mut sys = System::new();
        sys.refresh_cpu_all();
        sys.refresh_memory();

        let cpu = sys
            .cpus()
            .first()
            .map(|c| c.brand().trim().to_string())
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        SystemInfo {
            os: os_info::get().to_string(),
            cpu,
            logical_cores: sys.cpus().len(),
            total_memory_mib: sys.total_memory() / (1024 * 1024),
        }
    }
}

impl fmt::Display for SystemInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OS:     {}", self.os)?;
        writeln!(f, "CPU:    {} ({} logical cores)", self.cpu, self.logical_cores)?;
        write!(f, "Memory: {} MiB", self.total_memory_mib)
    }
}
