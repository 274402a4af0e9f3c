//! Hit-test ownership for the overlay window. The display layer only ever
//! asks "capture" or "release"; this module owns the actual mode and talks
//! to the window.
//!
//! While the window ignores cursor events the OS delivers no pointer
//! messages to the webview at all, so the frontend's enter/leave handlers
//! alone cannot get the overlay back out of click-through. The hover
//! watcher closes that gap host-side: it polls the global cursor against
//! the window bounds and flips hit-testing on enter/leave, which emulates
//! click-through-with-forwarding on hosts that lack a forward mode.

use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use log::{info, warn};
use tauri::{AppHandle, Manager, PhysicalPosition, PhysicalSize, WebviewWindow};
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::settings::{OverlayAnchor, OverlaySettings};

pub const HUD_WINDOW_LABEL: &str = "hud";
pub const HOVER_POLL_INTERVAL_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTestMode {
    /// Pointer events pass through to whatever sits beneath the overlay.
    ClickThrough,
    /// The overlay consumes pointer events itself.
    Capturing,
}

impl HitTestMode {
    pub fn from_ignore(ignore: bool) -> Self {
        if ignore {
            HitTestMode::ClickThrough
        } else {
            HitTestMode::Capturing
        }
    }

    pub fn ignores_cursor(self) -> bool {
        matches!(self, HitTestMode::ClickThrough)
    }
}

/// Window-side half of the hit-test toggle, behind a trait so tests can use
/// a recording fake instead of a live webview window.
pub trait CursorSurface: Send + Sync {
    fn set_ignore_cursor_events(&self, ignore: bool) -> Result<()>;
}

/// Global-cursor probe for the hover watcher, behind a trait for the same
/// reason.
pub trait CursorProbe: Send + Sync {
    /// Whether the cursor is currently over the HUD window. `Ok(None)` means
    /// the position or bounds cannot be read right now (no pointer, window
    /// gone); the watcher leaves the mode alone for that tick.
    fn cursor_over_window(&self) -> Result<Option<bool>>;
}

pub struct WebviewSurface {
    app: AppHandle,
}

impl WebviewSurface {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }
}

impl CursorSurface for WebviewSurface {
    fn set_ignore_cursor_events(&self, ignore: bool) -> Result<()> {
        let Some(window) = self.app.get_webview_window(HUD_WINDOW_LABEL) else {
            // Running without the overlay window (teardown, headless dev):
            // host communication degrades to a logged no-op.
            warn!("hit-test request dropped: window '{HUD_WINDOW_LABEL}' not found");
            return Ok(());
        };

        window
            .set_ignore_cursor_events(ignore)
            .context("set_ignore_cursor_events failed")
    }
}

impl CursorProbe for WebviewSurface {
    fn cursor_over_window(&self) -> Result<Option<bool>> {
        let Some(window) = self.app.get_webview_window(HUD_WINDOW_LABEL) else {
            return Ok(None);
        };

        let cursor = window
            .cursor_position()
            .context("failed to read cursor position")?;
        let position = window
            .outer_position()
            .context("failed to read window position")?;
        let size = window
            .outer_size()
            .context("failed to read window size")?;

        Ok(Some(window_contains(position, size, cursor)))
    }
}

pub struct OverlayController<S: CursorSurface> {
    surface: S,
    mode: Mutex<HitTestMode>,
}

impl<S: CursorSurface> OverlayController<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            mode: Mutex::new(HitTestMode::ClickThrough),
        }
    }

    pub fn mode(&self) -> HitTestMode {
        *self.mode.lock().unwrap()
    }

    /// Applied once at startup so the overlay begins fully click-through
    /// regardless of where the pointer happens to be.
    pub fn init(&self) -> Result<()> {
        self.apply(HitTestMode::ClickThrough)
    }

    /// A `set-ignore-mouse-events` control, from the display layer or the
    /// hover watcher: true → click-through, false → capture.
    pub fn request(&self, ignore: bool) -> Result<()> {
        self.apply(HitTestMode::from_ignore(ignore))
    }

    fn apply(&self, next: HitTestMode) -> Result<()> {
        self.surface.set_ignore_cursor_events(next.ignores_cursor())?;

        let mut guard = self.mode.lock().unwrap();
        if *guard != next {
            info!("hit-test mode: {:?} -> {:?}", *guard, next);
            *guard = next;
        }
        Ok(())
    }
}

/// Repeating cursor watch. Only a change in the inside/outside reading
/// touches the window, so the steady state is silent.
pub async fn hover_loop<S, P>(
    overlay: Arc<OverlayController<S>>,
    probe: P,
    cancel_token: CancellationToken,
) where
    S: CursorSurface,
    P: CursorProbe,
{
    let mut ticker = tokio::time::interval(Duration::from_millis(HOVER_POLL_INTERVAL_MS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last_inside: Option<bool> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let inside = match probe.cursor_over_window() {
                    Ok(Some(inside)) => inside,
                    Ok(None) => continue,
                    Err(err) => {
                        log::debug!("cursor probe failed: {err:?}");
                        continue;
                    }
                };

                if last_inside != Some(inside) {
                    // Enter captures, leave releases.
                    match overlay.request(!inside) {
                        Ok(()) => last_inside = Some(inside),
                        Err(err) => warn!("hover hit-test toggle failed: {err:?}"),
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                info!("cursor hover watcher shutting down");
                break;
            }
        }
    }
}

/// Lifecycle handle for the hover watch task, torn down with the window.
pub struct HoverWatcher {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl HoverWatcher {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn start<S, P>(&mut self, overlay: Arc<OverlayController<S>>, probe: P) -> Result<()>
    where
        S: CursorSurface + 'static,
        P: CursorProbe + 'static,
    {
        if self.handle.is_some() {
            bail!("hover watcher already running");
        }

        info!("starting cursor hover watcher");

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(hover_loop(overlay, probe, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("hover watcher task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

fn window_contains(
    position: PhysicalPosition<i32>,
    size: PhysicalSize<u32>,
    cursor: PhysicalPosition<f64>,
) -> bool {
    let left = position.x as f64;
    let top = position.y as f64;
    let right = left + size.width as f64;
    let bottom = top + size.height as f64;

    cursor.x >= left && cursor.x < right && cursor.y >= top && cursor.y < bottom
}

/// Corner placement for a window of `(win_w, win_h)` on a `(screen_w,
/// screen_h)` monitor, inset by `margin` physical pixels.
pub fn anchored_position(
    anchor: OverlayAnchor,
    screen_w: u32,
    screen_h: u32,
    win_w: u32,
    win_h: u32,
    margin: u32,
) -> (i32, i32) {
    let margin = margin as i32;
    let right = screen_w as i32 - win_w as i32 - margin;
    let bottom = screen_h as i32 - win_h as i32 - margin;

    match anchor {
        OverlayAnchor::TopLeft => (margin, margin),
        OverlayAnchor::TopRight => (right, margin),
        OverlayAnchor::BottomLeft => (margin, bottom),
        OverlayAnchor::BottomRight => (right, bottom),
    }
}

/// Move the overlay window into its configured corner of the primary
/// monitor. Missing monitor information leaves the window where it is.
pub fn place_window(window: &WebviewWindow, settings: &OverlaySettings) -> Result<()> {
    let Some(monitor) = window
        .primary_monitor()
        .context("failed to query primary monitor")?
    else {
        return Ok(());
    };

    let screen = monitor.size();
    let size = window.outer_size().context("failed to query window size")?;
    let (x, y) = anchored_position(
        settings.anchor,
        screen.width,
        screen.height,
        size.width,
        size.height,
        settings.margin,
    );

    window
        .set_position(PhysicalPosition::new(x, y))
        .context("failed to position overlay window")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    /// Records every ignore flag handed to the window.
    #[derive(Default)]
    struct RecordingSurface {
        calls: StdMutex<Vec<bool>>,
        fail: bool,
    }

    impl CursorSurface for RecordingSurface {
        fn set_ignore_cursor_events(&self, ignore: bool) -> Result<()> {
            if self.fail {
                anyhow::bail!("window unavailable");
            }
            self.calls.lock().unwrap().push(ignore);
            Ok(())
        }
    }

    /// Replays a fixed sequence of inside/outside readings, then goes quiet.
    struct ScriptedProbe {
        readings: StdMutex<VecDeque<Option<bool>>>,
    }

    impl ScriptedProbe {
        fn new<const N: usize>(readings: [Option<bool>; N]) -> Self {
            Self {
                readings: StdMutex::new(readings.into_iter().collect()),
            }
        }
    }

    impl CursorProbe for ScriptedProbe {
        fn cursor_over_window(&self) -> Result<Option<bool>> {
            Ok(self.readings.lock().unwrap().pop_front().flatten())
        }
    }

    #[test]
    fn starts_click_through_and_init_forwards_ignore_true() {
        let overlay = OverlayController::new(RecordingSurface::default());
        assert_eq!(overlay.mode(), HitTestMode::ClickThrough);

        overlay.init().unwrap();
        assert_eq!(overlay.surface.calls.lock().unwrap().as_slice(), &[true]);
        assert_eq!(overlay.mode(), HitTestMode::ClickThrough);
    }

    #[test]
    fn pointer_enter_then_leave_round_trips_the_state_machine() {
        let overlay = OverlayController::new(RecordingSurface::default());

        overlay.request(false).unwrap();
        assert_eq!(overlay.mode(), HitTestMode::Capturing);

        overlay.request(true).unwrap();
        assert_eq!(overlay.mode(), HitTestMode::ClickThrough);

        assert_eq!(
            overlay.surface.calls.lock().unwrap().as_slice(),
            &[false, true]
        );
    }

    #[test]
    fn surface_failure_leaves_mode_unchanged() {
        let overlay = OverlayController::new(RecordingSurface {
            fail: true,
            ..Default::default()
        });

        assert!(overlay.request(false).is_err());
        assert_eq!(overlay.mode(), HitTestMode::ClickThrough);
    }

    #[tokio::test(start_paused = true)]
    async fn hover_watcher_captures_on_enter_and_releases_on_leave() {
        let overlay = Arc::new(OverlayController::new(RecordingSurface::default()));
        // outside → enter → steady hover → unreadable tick → leave
        let probe = ScriptedProbe::new([
            Some(false),
            Some(true),
            Some(true),
            None,
            Some(false),
        ]);

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(hover_loop(overlay.clone(), probe, cancel_token.clone()));

        tokio::time::sleep(Duration::from_millis(HOVER_POLL_INTERVAL_MS * 6)).await;
        cancel_token.cancel();
        handle.await.unwrap();

        // Enter toggled capture, steady hover and the unreadable tick were
        // silent, leave released again.
        assert_eq!(
            overlay.surface.calls.lock().unwrap().as_slice(),
            &[true, false, true]
        );
        assert_eq!(overlay.mode(), HitTestMode::ClickThrough);
    }

    #[tokio::test]
    async fn hover_watcher_rejects_double_start_and_stop_is_reentrant() {
        let overlay = Arc::new(OverlayController::new(RecordingSurface::default()));

        let mut watcher = HoverWatcher::new();
        watcher
            .start(overlay.clone(), ScriptedProbe::new([]))
            .unwrap();
        assert!(watcher.start(overlay, ScriptedProbe::new([])).is_err());

        watcher.stop().await.unwrap();
        watcher.stop().await.unwrap();
    }

    #[test]
    fn window_contains_uses_half_open_bounds() {
        let position = PhysicalPosition::new(100, 50);
        let size = PhysicalSize::new(320u32, 190u32);
        let at = |x: f64, y: f64| window_contains(position, size, PhysicalPosition::new(x, y));

        assert!(at(100.0, 50.0));
        assert!(at(300.0, 150.0));
        assert!(!at(99.0, 50.0));
        assert!(!at(420.0, 150.0));
        assert!(!at(300.0, 240.0));
    }

    #[test]
    fn anchored_position_covers_all_corners() {
        let corner = |anchor| anchored_position(anchor, 1920, 1080, 320, 190, 24);
        assert_eq!(corner(OverlayAnchor::TopLeft), (24, 24));
        assert_eq!(corner(OverlayAnchor::TopRight), (1576, 24));
        assert_eq!(corner(OverlayAnchor::BottomLeft), (24, 866));
        assert_eq!(corner(OverlayAnchor::BottomRight), (1576, 866));
    }
}
