//! Server lifecycle management.

use anyhow::{Context, Result};
use assetkit::config::AssetkitConfig;
use assetkit::fs::Mode;
use assetkit::sync::{SyncHandle, TreeSynchronizer};
use assetkit::{debug, log};
use std::net::{IpAddr, SocketAddr};
use tiny_http::Server;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_err = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_err = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_err.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Start the synchronizer when watching applies.
///
/// Only the live filesystem sees mirrored files, so production never
/// watches. Runs before the server binds so the live tree is populated
/// by the first request.
pub fn spawn_sync(config: &AssetkitConfig, mode: Mode, watch: bool) -> Result<Option<SyncHandle>> {
    if !watch {
        return Ok(None);
    }
    if !mode.is_live() {
        debug!("watch"; "snapshot mode, not watching {}", config.sync.input.display());
        return Ok(None);
    }

    let handle = TreeSynchronizer::from_config(&config.sync)
        .spawn()
        .with_context(|| format!("failed to watch {}", config.sync.input.display()))?;
    Ok(Some(handle))
}
