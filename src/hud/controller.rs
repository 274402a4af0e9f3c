use std::sync::Arc;

use log::info;
use rand::Rng;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::bus::{ActiveWindowPayload, HudBus};
use crate::platform::ForegroundWindow;

use super::confidence::CONFIDENCE_MAX_STEP;
use super::state::HudState;

pub const JITTER_INTERVAL_MS: u64 = 1_000;

/// Owns the displayed HUD state. Foreground snapshots are reduced in and
/// re-broadcast over the bus; an independent 1 s task keeps the decorative
/// confidence meter drifting.
pub struct HudController<B: HudBus> {
    state: Arc<Mutex<HudState>>,
    bus: Arc<B>,
    jitter: Mutex<Option<(CancellationToken, JoinHandle<()>)>>,
}

impl<B: HudBus> HudController<B> {
    pub fn new(bus: Arc<B>) -> Self {
        Self {
            state: Arc::new(Mutex::new(HudState::new())),
            bus,
            jitter: Mutex::new(None),
        }
    }

    pub async fn snapshot(&self) -> HudState {
        self.state.lock().await.clone()
    }

    /// One `active-window-change` delivery: forward the raw snapshot to the
    /// display layer, reduce it into local state, then re-render.
    pub async fn apply_window(&self, window: &ForegroundWindow) {
        let state = {
            let mut guard = self.state.lock().await;
            guard.apply_window(window);
            guard.clone()
        };

        self.bus.active_window_changed(&ActiveWindowPayload::from(window));
        self.bus.hud_state_changed(&state);
    }

    /// Spawn the repeating confidence-jitter task. Idempotent.
    pub async fn start_jitter(&self) {
        let mut guard = self.jitter.lock().await;
        if guard.is_some() {
            return;
        }

        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let state = self.state.clone();
        let bus = self.bus.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(Duration::from_millis(JITTER_INTERVAL_MS));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick completes immediately; swallow it so
            // the meter stays at 0 for the first full period.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let snapshot = {
                            let mut guard = state.lock().await;
                            let delta = rand::thread_rng()
                                .gen_range(-CONFIDENCE_MAX_STEP..=CONFIDENCE_MAX_STEP);
                            guard.nudge_confidence(delta);
                            guard.clone()
                        };
                        bus.hud_state_changed(&snapshot);
                    }
                    _ = token.cancelled() => {
                        info!("confidence jitter task shutting down");
                        break;
                    }
                }
            }
        });

        *guard = Some((cancel_token, handle));
    }

    pub async fn stop_jitter(&self) {
        if let Some((token, handle)) = self.jitter.lock().await.take() {
            token.cancel();
            let _ = handle.await;
        }
    }
}
