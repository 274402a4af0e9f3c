//! OS foreground-window query. One call per poll tick; callers treat every
//! failure as "skip this tick", so nothing here is allowed to panic.

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

use anyhow::Result;

/// Snapshot of the application currently holding input focus. Produced once
/// per tick and immediately superseded by the next one; no history is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundWindow {
    pub title: String,
    pub owner_name: Option<String>,
    pub owner_path: Option<String>,
}

/// True when this build carries a foreground-query backend.
pub const fn supported() -> bool {
    cfg!(any(target_os = "windows", target_os = "macos"))
}

/// Query the focused window. `Ok(None)` means nothing currently holds focus
/// (empty desktop, secure screen); that is a skipped tick, not an error.
pub fn foreground_window() -> Result<Option<ForegroundWindow>> {
    #[cfg(target_os = "windows")]
    {
        windows::foreground_window()
    }

    #[cfg(target_os = "macos")]
    {
        macos::foreground_window()
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        Ok(None)
    }
}

/// Resolve the owning process's name and executable path from its pid.
#[cfg(any(target_os = "windows", target_os = "macos"))]
pub(crate) fn resolve_owner(pid: u32) -> (Option<String>, Option<String>) {
    use sysinfo::{Pid, ProcessesToUpdate, System};

    let mut system = System::new();
    let pid = Pid::from_u32(pid);
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]));

    match system.process(pid) {
        Some(process) => (
            Some(process.name().to_string_lossy().into_owned()),
            process.exe().map(|path| path.display().to_string()),
        ),
        None => (None, None),
    }
}
