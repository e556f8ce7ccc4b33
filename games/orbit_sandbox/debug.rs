use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

pub struct DebugFlags {
    pub overlay: AtomicBool,
}

impl DebugFlags {
    pub fn set_overlay(&self, enabled: bool) {
        self.overlay.store(enabled, Ordering::Relaxed);
    }

    pub fn is_overlay_enabled(&self) -> bool {
        self.overlay.load(Ordering::Relaxed)
    }
}

static DEBUG_FLAGS: DebugFlags = DebugFlags {
    overlay: AtomicBool::new(false),
};

pub fn debug_flags() -> &'static DebugFlags {
    &DEBUG_FLAGS
}

/// Toggle the statistics overlay (body count, camera, energy)
pub fn toggle_debug_overlay() {
    let current = DEBUG_FLAGS.is_overlay_enabled();
    DEBUG_FLAGS.set_overlay(!current);
    info!("debug overlay: {}", if !current { "ON" } else { "OFF" });
}
