mod bus;
mod hud;
mod overlay;
mod platform;
mod poller;
mod settings;
mod utils;

use std::sync::Arc;

use bus::TauriBus;
use hud::{HudController, HudState};
use log::warn;
use overlay::{HoverWatcher, OverlayController, WebviewSurface, HUD_WINDOW_LABEL};
use poller::PollerController;
use settings::{OverlaySettings, SettingsStore};
use tauri::{Emitter, Manager, State};

pub(crate) struct AppState {
    hud: Arc<HudController<TauriBus>>,
    overlay: Arc<OverlayController<WebviewSurface>>,
    poller: tokio::sync::Mutex<PollerController>,
    hover: tokio::sync::Mutex<HoverWatcher>,
    settings: SettingsStore,
}

/// Seed for the frontend's first render, before any event arrives.
#[tauri::command]
async fn get_hud_state(state: State<'_, AppState>) -> Result<HudState, String> {
    Ok(state.hud.snapshot().await)
}

/// `set-ignore-mouse-events` control from the display layer:
/// true → click-through, false → capture.
#[tauri::command]
fn set_ignore_mouse_events(ignore: bool, state: State<AppState>) -> Result<(), String> {
    state.overlay.request(ignore).map_err(|e| e.to_string())
}

#[tauri::command]
fn get_overlay_settings(state: State<AppState>) -> Result<OverlaySettings, String> {
    Ok(state.settings.overlay())
}

#[tauri::command]
fn set_overlay_settings(
    settings: OverlaySettings,
    state: State<AppState>,
    app_handle: tauri::AppHandle,
) -> Result<(), String> {
    state
        .settings
        .update_overlay(settings.clone())
        .map_err(|e| e.to_string())?;

    if let Some(window) = app_handle.get_webview_window(HUD_WINDOW_LABEL) {
        if let Err(err) = overlay::place_window(&window, &settings) {
            warn!("failed to reposition overlay: {err:?}");
        }
    }

    app_handle
        .emit("overlay-settings-updated", &settings)
        .map_err(|e| e.to_string())?;

    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("intent-hud starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let settings_path = app_data_dir.join("settings.json");
                let settings_store = SettingsStore::new(settings_path)?;

                let bus = Arc::new(TauriBus::new(app.handle().clone()));
                let hud = Arc::new(HudController::new(bus));
                let overlay =
                    Arc::new(OverlayController::new(WebviewSurface::new(app.handle().clone())));

                // Start fully click-through regardless of pointer position;
                // a failure here degrades to a capturing-but-visible overlay.
                if let Err(err) = overlay.init() {
                    warn!("failed to apply initial click-through: {err:?}");
                }

                if let Some(window) = app.get_webview_window(HUD_WINDOW_LABEL) {
                    if let Err(err) = overlay::place_window(&window, &settings_store.overlay()) {
                        warn!("failed to position overlay window: {err:?}");
                    }
                }

                let mut poller = PollerController::new();
                let mut hover = HoverWatcher::new();
                let hud_for_tasks = hud.clone();
                let overlay_for_tasks = overlay.clone();
                let probe = WebviewSurface::new(app.handle().clone());
                tauri::async_runtime::block_on(async {
                    hud_for_tasks.start_jitter().await;

                    if platform::supported() {
                        // A poller that fails to start degrades to a static
                        // display; it must never take the shell down.
                        if let Err(err) = poller.start(hud_for_tasks.clone()) {
                            warn!("foreground poller not started: {err:?}");
                        }
                    } else {
                        warn!("no foreground-window backend on this platform; HUD stays static");
                    }

                    // Click-through suppresses pointer events to the webview,
                    // so enter/leave has to be detected host-side.
                    if let Err(err) = hover.start(overlay_for_tasks, probe) {
                        warn!("hover watcher not started: {err:?}");
                    }
                });

                app.manage(AppState {
                    hud,
                    overlay,
                    poller: tokio::sync::Mutex::new(poller),
                    hover: tokio::sync::Mutex::new(hover),
                    settings: settings_store,
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .on_window_event(|window, event| {
            if let tauri::WindowEvent::Destroyed = event {
                let Some(state) = window.try_state::<AppState>() else {
                    return;
                };
                tauri::async_runtime::block_on(async {
                    state.hud.stop_jitter().await;
                    if let Err(err) = state.poller.lock().await.stop().await {
                        warn!("poller shutdown: {err:?}");
                    }
                    if let Err(err) = state.hover.lock().await.stop().await {
                        warn!("hover watcher shutdown: {err:?}");
                    }
                });
            }
        })
        .invoke_handler(tauri::generate_handler![
            get_hud_state,
            set_ignore_mouse_events,
            get_overlay_settings,
            set_overlay_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
