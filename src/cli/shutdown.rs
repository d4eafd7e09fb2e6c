//! Ctrl+C handling shared by long-running commands.

use anyhow::Result;
use crossbeam::channel::Sender;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tiny_http::Server;

/// Shutdown flag (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// HTTP server handle, unblocked on shutdown
static SERVER: OnceLock<Arc<Server>> = OnceLock::new();

/// Stop signal for a running synchronizer
static STOP_TX: OnceLock<Sender<()>> = OnceLock::new();

/// Install the global Ctrl+C handler.
///
/// Stops the synchronizer and unblocks the server when either is
/// registered; otherwise there is nothing to wind down and the process
/// exits at once.
pub fn setup_shutdown_handler() -> Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        let stop = STOP_TX.get();
        if let Some(tx) = stop {
            let _ = tx.try_send(());
        }

        if let Some(server) = SERVER.get() {
            assetkit::log!("serve"; "shutting down...");
            server.unblock();
        } else if stop.is_none() {
            std::process::exit(0);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the HTTP server for graceful shutdown.
pub fn register_server(server: Arc<Server>) {
    let _ = SERVER.set(server);
}

/// Register a synchronizer stop signal.
pub fn register_stop(stop: Sender<()>) {
    let _ = STOP_TX.set(stop);
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
