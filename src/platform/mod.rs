//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logging setup
//! - Input edge detection

/// Install the logger for the current target
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    // Already installed on a second call
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Install the logger for the current target (`RUST_LOG` overrides `info`)
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}

/// Turns raw press/release events into the per-tick input contract.
///
/// A press is remembered until polled once (edge-triggered), while the held
/// state is reported as-is (level-triggered).
#[derive(Debug, Clone, Copy, Default)]
pub struct InputLatch {
    pressed: bool,
    held: bool,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self) {
        if !self.held {
            self.pressed = true;
        }
        self.held = true;
    }

    pub fn release(&mut self) {
        self.held = false;
    }

    /// Tap since the last poll, consumed by this call
    pub fn take_tap(&mut self) -> bool {
        std::mem::take(&mut self.pressed)
    }

    pub fn held(&self) -> bool {
        self.held
    }
}
