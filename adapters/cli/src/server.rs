//! Sequential accept loop: one session runs to completion before the next
//! connection is accepted.

use std::{
    io::BufReader,
    net::{TcpListener, TcpStream},
};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{config::ClientConfig, protocol::LineChannel, session::Session};

/// Binds the listener named by the configuration.
pub fn bind(config: &ClientConfig) -> Result<TcpListener> {
    TcpListener::bind(config.bind)
        .with_context(|| format!("failed to listen on {}", config.bind))
}

/// Serves connections one at a time until `max_sessions` is reached, or
/// forever when unset.
pub fn serve(listener: &TcpListener, config: &ClientConfig) -> Result<()> {
    if config.max_sessions == Some(0) {
        return Ok(());
    }

    let mut served = 0_usize;
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                served += 1;
                serve_connection(stream, config);
            }
            Err(err) => warn!("Error accepting server connection: {}", err),
        }

        if config.max_sessions.is_some_and(|limit| served >= limit) {
            info!(served, "session limit reached");
            break;
        }
    }
    Ok(())
}

fn serve_connection(stream: TcpStream, config: &ClientConfig) {
    let peer = stream
        .peer_addr()
        .map_or_else(|_| "unknown".to_owned(), |addr| addr.to_string());
    info!(%peer, "session.started");

    if let Err(err) = stream.set_nodelay(true) {
        warn!("Failed to set TCP_NODELAY: {}", err);
    }
    let reader = match stream.try_clone() {
        Ok(reader) => BufReader::new(reader),
        Err(err) => {
            warn!(%peer, "Failed to clone session stream: {}", err);
            return;
        }
    };

    let mut channel = LineChannel::new(reader, stream);
    let mut session = Session::new(config);
    match session.run(&mut channel) {
        Ok(ticks) => info!(%peer, ticks, "session.closed"),
        Err(err) => warn!(
            %peer,
            lines = channel.lines_read(),
            "session.aborted: {:#}",
            anyhow::Error::new(err)
        ),
    }
}
