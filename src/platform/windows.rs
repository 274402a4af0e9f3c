use anyhow::Result;
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowTextW, GetWindowThreadProcessId,
};

use super::{resolve_owner, ForegroundWindow};

pub(super) fn foreground_window() -> Result<Option<ForegroundWindow>> {
    let hwnd = unsafe { GetForegroundWindow() };
    if hwnd.is_invalid() {
        // No foreground window during desktop transitions or lock screen.
        return Ok(None);
    }

    let title = window_title(hwnd);

    let mut pid: u32 = 0;
    unsafe { GetWindowThreadProcessId(hwnd, Some(&mut pid)) };
    if pid == 0 {
        return Ok(Some(ForegroundWindow {
            title,
            owner_name: None,
            owner_path: None,
        }));
    }

    let (owner_name, owner_path) = resolve_owner(pid);
    Ok(Some(ForegroundWindow {
        title,
        owner_name,
        owner_path,
    }))
}

fn window_title(hwnd: HWND) -> String {
    let mut buf = [0u16; 512];
    let len = unsafe { GetWindowTextW(hwnd, &mut buf) };
    String::from_utf16_lossy(&buf[..len.max(0) as usize])
}
