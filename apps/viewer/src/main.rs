use std::path::Path;

use crossbeam_channel::bounded;
use serde::Deserialize;

use platform_window::config::load_toml_or_default;
use platform_window::{CanonicalEvent, Delivery, PlatformWindow, WindowConfig, WindowResult};
use platform_window_logging::LogConfig;

const DEFAULT_CONFIG: &str = "viewer.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DeliveryMode {
    #[default]
    Callback,
    Poll,
}

#[derive(Debug, Default, Deserialize)]
struct ViewerConfig {
    #[serde(default)]
    window: WindowConfig,
    #[serde(default)]
    log: LogConfig,
    #[serde(default)]
    delivery: DeliveryMode,
}

fn main() -> WindowResult<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_owned());
    let config: ViewerConfig = load_toml_or_default(Path::new(&path))?;

    platform_window_logging::init(&config.log);
    log::info!("viewer config: {:?}", config);

    match config.delivery {
        DeliveryMode::Callback => run_callback(config.window),
        DeliveryMode::Poll => run_poll(config.window),
    }
}

fn log_event(ev: &CanonicalEvent) {
    match ev {
        CanonicalEvent::MouseMove { .. } => log::trace!("{:?}", ev),
        _ => log::info!("{:?}", ev),
    }
}

fn run_callback(window: WindowConfig) -> WindowResult<()> {
    let (quit_tx, quit_rx) = bounded::<()>(1);

    let window = PlatformWindow::create(
        window,
        Delivery::callback(move |ev| {
            log_event(&ev);
            if ev == CanonicalEvent::QuitRequest {
                let _ = quit_tx.try_send(());
            }
        }),
    )?;
    log::info!("size after create: {:?}", window.size());

    // Disconnects too if the pump thread dies and drops the callback.
    let _ = quit_rx.recv();
    window.destroy()
}

fn run_poll(window: WindowConfig) -> WindowResult<()> {
    let window = PlatformWindow::create(window, Delivery::poll())?;
    log::info!("size after create: {:?}", window.size());

    loop {
        let ev = window.wait_for_next_event();
        if ev.is_none() {
            continue;
        }
        log_event(&ev);
        if let CanonicalEvent::Resized { .. } = ev {
            window.set_title(&format!("Viewer {}x{}", window.size().width, window.size().height))?;
        }
        if ev == CanonicalEvent::QuitRequest {
            break;
        }
    }

    window.destroy()
}
