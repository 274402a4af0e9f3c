use anyhow::Result;
use objc2_app_kit::NSWorkspace;

use super::{resolve_owner, ForegroundWindow};

pub(super) fn foreground_window() -> Result<Option<ForegroundWindow>> {
    let frontmost = unsafe { NSWorkspace::sharedWorkspace().frontmostApplication() };
    let Some(app) = frontmost else {
        return Ok(None);
    };

    let app_name = unsafe { app.localizedName() }.map(|name| name.to_string());

    let pid = unsafe { app.processIdentifier() };
    let (owner_name, owner_path) = if pid > 0 {
        resolve_owner(pid as u32)
    } else {
        (None, None)
    };
    let owner_name = owner_name.or_else(|| app_name.clone());

    // Per-window titles need the accessibility API; the application name is
    // the best focus signal available without extra privileges.
    let title = app_name.unwrap_or_default();

    Ok(Some(ForegroundWindow {
        title,
        owner_name,
        owner_path,
    }))
}
