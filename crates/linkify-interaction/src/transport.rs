//! Host channel transport.
//!
//! Frames are newline-delimited JSON over any byte stream. The pump feeds
//! inbound frames into the dispatcher and drains the outbound queue onto
//! the wire; it runs until either side of the channel closes.

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::codec::{Framed, LinesCodec};
use tracing::{info, warn};

use linkify_core::error::{LinkifyError, Result};
use linkify_core::message::OutboundMessage;

use crate::dispatcher::MessageDispatcher;

/// Connects to the Unix-domain endpoint an embedding host handed down.
#[cfg(unix)]
pub async fn connect_host(path: &std::path::Path) -> Result<tokio::net::UnixStream> {
    tokio::net::UnixStream::connect(path)
        .await
        .map_err(|e| LinkifyError::network(format!("host endpoint unreachable: {e}")))
}

/// Runs the channel pump over a connected stream.
///
/// Inbound frames go through the dispatcher (which absorbs malformed
/// ones); outbound messages come from the queue a [`HostLink`] feeds.
/// Returns when the stream or the outbound queue closes.
///
/// [`HostLink`]: crate::host_link::HostLink
pub async fn run_host_transport<S>(
    stream: S,
    dispatcher: MessageDispatcher,
    mut outbound: UnboundedReceiver<OutboundMessage>,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut framed = Framed::new(stream, LinesCodec::new());

    loop {
        tokio::select! {
            frame = framed.next() => match frame {
                Some(Ok(line)) => dispatcher.dispatch_raw(&line),
                Some(Err(e)) => {
                    warn!(error = %e, "host channel read failed");
                    return Err(LinkifyError::network(e.to_string()));
                }
                None => {
                    info!("host channel closed by peer");
                    return Ok(());
                }
            },
            message = outbound.recv() => match message {
                Some(message) => {
                    let frame = message.encode()?;
                    framed
                        .send(frame)
                        .await
                        .map_err(|e| LinkifyError::network(e.to_string()))?;
                }
                None => {
                    info!("outbound queue closed; stopping host transport");
                    return Ok(());
                }
            },
        }
    }
}
