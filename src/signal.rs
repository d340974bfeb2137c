//! Ctrl+C handling for graceful shutdown.
//!
//! A single `AtomicBool` is shared between the signal handler and every
//! component that does long-running work. Walkers stop yielding entries,
//! pending checksum tasks are skipped and in-flight reads stop at the next
//! block once the flag is set. The scan then ends with
//! [`FinderError::Interrupted`](crate::duplicates::FinderError::Interrupted)
//! and the process exits with code 130.
//!
//! # Usage
//!
//! ```rust,no_run
//! use dupescan::duplicates::FinderConfig;
//! use dupescan::signal::install_handler;
//!
//! let handler = install_handler().expect("Failed to install signal handler");
//! let config = FinderConfig::default().with_shutdown_flag(handler.get_flag());
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Exit code for SIGINT (Ctrl+C) interruption: 128 + SIGINT.
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Shared shutdown flag.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if shutdown has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Request a shutdown without a signal.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Get the flag to hand to a [`FinderConfig`](crate::duplicates::FinderConfig).
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Clear the flag.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install a Ctrl+C handler that sets the shutdown flag.
///
/// The process-wide hook is registered once. Later calls (for example from
/// several `run_app` invocations in one test binary) get the same handler
/// back with its flag cleared.
///
/// # Errors
///
/// Returns [`SignalError`] if the hook cannot be registered for a reason
/// other than one already being present.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    if let Some(handler) = GLOBAL_HANDLER.get() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let flag = handler.get_flag();

    let installed = ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let mut stderr = std::io::stderr();
        let _ = writeln!(stderr, "\nInterrupted. Cleaning up...");
        let _ = stderr.flush();
        log::info!("Shutdown signal received");
    });

    match installed {
        Ok(()) => {
            let handler = GLOBAL_HANDLER.get_or_init(|| handler).clone();
            Ok(handler)
        }
        Err(ctrlc::Error::MultipleHandlers) => {
            log::debug!("Ctrl+C handler already registered, using unhooked handler");
            Ok(GLOBAL_HANDLER.get_or_init(ShutdownHandler::new).clone())
        }
        Err(e) => Err(SignalError::InstallFailed(e)),
    }
}
