//! Typed host↔display event channel. The HUD core only ever talks to the
//! webview through the [`HudBus`] trait, so tests can swap in an in-memory
//! recorder instead of a live Tauri app handle.

use log::warn;
use serde::Serialize;
use tauri::{AppHandle, Emitter};

use crate::hud::HudState;
use crate::platform::ForegroundWindow;

pub const ACTIVE_WINDOW_EVENT: &str = "active-window-change";
pub const HUD_STATE_EVENT: &str = "hud-state-changed";

/// Wire payload for `active-window-change`: `owner` is the process name,
/// `app` its executable path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveWindowPayload {
    pub title: String,
    pub owner: Option<String>,
    pub app: Option<String>,
}

impl From<&ForegroundWindow> for ActiveWindowPayload {
    fn from(window: &ForegroundWindow) -> Self {
        Self {
            title: window.title.clone(),
            owner: window.owner_name.clone(),
            app: window.owner_path.clone(),
        }
    }
}

/// One-way notifications from the host core to the display layer.
/// Delivery is at-most-once; a missed message is never redelivered because
/// the next one carries full state.
pub trait HudBus: Send + Sync + 'static {
    fn active_window_changed(&self, payload: &ActiveWindowPayload);
    fn hud_state_changed(&self, state: &HudState);
}

/// Production bus backed by Tauri's event system. Emission failures are
/// logged and swallowed; the display layer is optional, never load-bearing.
#[derive(Clone)]
pub struct TauriBus {
    app: AppHandle,
}

impl TauriBus {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl HudBus for TauriBus {
    fn active_window_changed(&self, payload: &ActiveWindowPayload) {
        if let Err(err) = self.app.emit(ACTIVE_WINDOW_EVENT, payload.clone()) {
            warn!("failed to emit {ACTIVE_WINDOW_EVENT}: {err}");
        }
    }

    fn hud_state_changed(&self, state: &HudState) {
        if let Err(err) = self.app.emit(HUD_STATE_EVENT, state.clone()) {
            warn!("failed to emit {HUD_STATE_EVENT}: {err}");
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records every emission so tests can assert on the exact sequence.
    #[derive(Default)]
    pub struct MemoryBus {
        pub windows: Mutex<Vec<ActiveWindowPayload>>,
        pub states: Mutex<Vec<HudState>>,
    }

    impl HudBus for MemoryBus {
        fn active_window_changed(&self, payload: &ActiveWindowPayload) {
            self.windows.lock().unwrap().push(payload.clone());
        }

        fn hud_state_changed(&self, state: &HudState) {
            self.states.lock().unwrap().push(state.clone());
        }
    }
}
