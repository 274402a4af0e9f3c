use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::bus::HudBus;
use crate::hud::HudController;
use crate::platform::{self, ForegroundWindow};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

const POLL_INTERVAL_MS: u64 = 500;
const QUERY_TIMEOUT_MS: u64 = 2_000;

/// Repeating foreground poll. Each tick queries the OS once and forwards a
/// successful snapshot to the HUD; a failed or empty tick is skipped and the
/// next scheduled tick starts fresh.
pub async fn poll_loop<B: HudBus>(hud: Arc<HudController<B>>, cancel_token: CancellationToken) {
    let mut ticker = tokio::time::interval(Duration::from_millis(POLL_INTERVAL_MS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let fut = poll_once(&hud);
                match tokio::time::timeout(Duration::from_millis(QUERY_TIMEOUT_MS), fut).await {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => log_error!("foreground poll failed: {err:?}"),
                    Err(_) => log_warn!("foreground poll timeout (> {}ms)", QUERY_TIMEOUT_MS),
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("foreground poll loop shutting down");
                break;
            }
        }
    }
}

async fn poll_once<B: HudBus>(hud: &HudController<B>) -> Result<()> {
    let result = tokio::task::spawn_blocking(platform::foreground_window)
        .await
        .map_err(|err| anyhow!("foreground query worker join failed: {err}"))?;

    apply_query_result(hud, result).await
}

/// Reduce one query outcome. A snapshot is forwarded to the HUD, an empty
/// result means nothing holds focus and the tick is skipped silently, an
/// error propagates to the per-tick logging above.
async fn apply_query_result<B: HudBus>(
    hud: &HudController<B>,
    result: Result<Option<ForegroundWindow>>,
) -> Result<()> {
    let Some(window) = result? else {
        return Ok(());
    };

    hud.apply_window(&window).await;
    Ok(())
}
