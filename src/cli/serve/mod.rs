//! Standalone asset server.

mod lifecycle;

use super::shutdown;
use anyhow::{Context, Result};
use assetkit::config::AssetkitConfig;
use assetkit::fs::Mode;
use assetkit::log;
use assetkit::manager::AssetManager;
use std::net::IpAddr;
use std::sync::Arc;
use tiny_http::{Response, Server, StatusCode};

/// Options for `assetkit serve`; `None` falls back to `[serve]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServeOptions {
    pub interface: Option<IpAddr>,
    pub port: Option<u16>,
    pub watch: Option<bool>,
}

/// Serve `/<prefix>/*` until Ctrl+C.
pub fn serve(config: &AssetkitConfig, mode: Mode, options: ServeOptions) -> Result<()> {
    let watch = options.watch.unwrap_or(config.serve.watch);
    let sync = lifecycle::spawn_sync(config, mode, watch)?;
    if let Some(handle) = &sync {
        shutdown::register_stop(handle.stop_signal());
    }

    let manager = AssetManager::from_config(&config.assets, mode)
        .with_context(|| format!("failed to load assets from {}", config.assets.root.display()))?;
    let manager = Arc::new(manager);

    let (server, addr) = lifecycle::bind_with_retry(
        options.interface.unwrap_or(config.serve.interface),
        options.port.unwrap_or(config.serve.port),
    )?;
    let server = Arc::new(server);
    shutdown::register_server(Arc::clone(&server));

    log!("serve"; "http://{}{} ({:?})", addr, manager.handler_pattern(), mode);
    run_request_loop(&server, &manager)?;

    if let Some(handle) = sync {
        handle.stop();
    }
    Ok(())
}

fn run_request_loop(server: &Server, manager: &Arc<AssetManager>) -> Result<()> {
    // Requests are independent; the fingerprint index is the only shared state.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .context("failed to create thread pool")?;

    for request in server.incoming_requests() {
        let manager = Arc::clone(manager);
        pool.spawn(move || {
            if shutdown::is_shutdown() {
                let response = Response::from_string("503 Service Unavailable")
                    .with_status_code(StatusCode(503));
                let _ = request.respond(response);
                return;
            }
            if let Err(e) = manager.handle(request) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}
