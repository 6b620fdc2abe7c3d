//! Debug Utilities Module
//!
//! Debug narration is off by default so the core stays quiet in library
//! use; the CLI flips it on with a flag. State is process-global, which
//! matches the single-threaded, single-session execution model.

use std::sync::atomic::{AtomicBool, Ordering};

/// Global debug state
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Debug utilities for simulator narration
pub struct DebugUtils;

impl DebugUtils {
    /// Enable debug output
    ///
    /// When enabled, debug output functions will produce output.
    /// When disabled, debug output is suppressed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use infrastructure_debugging::DebugUtils;
    ///
    /// DebugUtils::enable();
    /// DebugUtils::debug_output("This will be printed");
    /// DebugUtils::disable();
    /// DebugUtils::debug_output("This will be suppressed");
    /// ```
    pub fn enable() {
        DEBUG_ENABLED.store(true, Ordering::Release);
    }

    /// Disable debug output
    pub fn disable() {
        DEBUG_ENABLED.store(false, Ordering::Release);
    }

    /// Check if debug output is enabled
    pub fn is_enabled() -> bool {
        DEBUG_ENABLED.load(Ordering::Acquire)
    }

    /// Print a debug message if debug output is enabled
    pub fn debug_output(message: &str) {
        if Self::is_enabled() {
            println!("{}", message);
        }
    }
}
