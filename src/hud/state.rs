use serde::Serialize;

use crate::platform::ForegroundWindow;

use super::confidence::ConfidenceMeter;
use super::intent::{classify, IntentLabel};

/// Shown until the first successful poll tick arrives.
pub const DETECTING: &str = "Detecting...";
/// Fallback when the OS reports a window without an owner name.
pub const UNKNOWN_OWNER: &str = "Unknown";

/// Everything the HUD renders. Recomputed wholesale from the latest
/// foreground snapshot; there is no memory of earlier labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HudState {
    pub app_context: String,
    pub intent: IntentLabel,
    pub confidence: ConfidenceMeter,
}

impl Default for HudState {
    fn default() -> Self {
        Self {
            app_context: DETECTING.to_string(),
            intent: IntentLabel::Idle,
            confidence: ConfidenceMeter::new(),
        }
    }
}

impl HudState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reduce one foreground snapshot into the displayed state. An empty
    /// owner name counts as missing.
    pub fn apply_window(&mut self, window: &ForegroundWindow) {
        let owner = window
            .owner_name
            .as_deref()
            .filter(|name| !name.is_empty());
        self.app_context = owner.unwrap_or(UNKNOWN_OWNER).to_string();
        self.intent = classify(owner);
    }

    pub fn nudge_confidence(&mut self, delta: f64) {
        self.confidence.nudge(delta);
    }
}
