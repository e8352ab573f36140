//! Native messaging host bridging a browser extension to a desktop
//! picker.
//!
//! The browser launches the host binary and speaks length-prefixed
//! JSON over its stdin/stdout. Each request names a command; picker
//! commands spawn `rofi`, wait for the user's choice, bring the
//! browser window forward, and answer with a result string the
//! extension acts on. Handler failures are contained per request;
//! stream corruption ends the session.
//!
//! Layering, outermost first:
//! - [`NativeMessagingHost`]: the session loop over one stream pair.
//! - [`protocol`]: framing and the request/response envelopes.
//! - [`router`]: tag dispatch and failure containment.
//! - [`routes`]: the command handlers.
//! - [`selection`]: choice-to-result resolution shared by the
//!   picker routes.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod protocol;
pub mod route_trait;
pub mod router;
pub mod routes;
pub mod selection;
pub mod traits;

#[cfg(test)]
mod test_support;

pub use config::HostConfig;
pub use diagnostics::{DiagnosticsSink, FileSink, MemorySink};
pub use error::{HostError, HostResult};
pub use protocol::{DispatchTag, NativeMessagingProtocol, Request, Response};
pub use route_trait::{HostRoute, RequestShape, RouteMetadata};
pub use router::{MessageRouter, RouteContext};
pub use traits::{CommandActivator, WindowActivator};

use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};

/// One native messaging session: a codec over a stream pair and the
/// router that answers its requests.
pub struct NativeMessagingHost<R, W> {
    protocol: NativeMessagingProtocol<R, W>,
    router: MessageRouter,
}

impl<R, W> NativeMessagingHost<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Build a host over arbitrary streams.
    pub fn new(protocol: NativeMessagingProtocol<R, W>, router: MessageRouter) -> Self {
        Self { protocol, router }
    }

    /// Serve requests until the peer closes the stream.
    ///
    /// Every decoded request produces exactly one response frame, in
    /// order. Returns `Ok(())` on clean end-of-stream (the browser
    /// closed the pipe at a frame boundary).
    ///
    /// # Errors
    ///
    /// Framing, decode, and write errors are fatal: the stream
    /// contract with the browser is broken and no further frame can
    /// be trusted, so the loop stops without answering.
    pub async fn run(&mut self) -> HostResult<()> {
        loop {
            let Some(request) = self.protocol.read_message().await? else {
                tracing::info!("peer closed the stream; session complete");
                return Ok(());
            };

            let response = self.router.dispatch(request).await;
            self.protocol.write_message(&response).await?;
        }
    }
}

/// Run a full host session over stdin/stdout with every route
/// registered.
///
/// # Errors
///
/// Propagates fatal protocol errors from the session loop.
pub async fn run_host(
    config: HostConfig,
    activator: Arc<dyn WindowActivator>,
    diagnostics: Arc<dyn diagnostics::DiagnosticsSink>,
) -> HostResult<()> {
    let protocol = NativeMessagingProtocol::stdio(config.max_message_size);

    let ctx = RouteContext::new(Arc::new(config), activator, diagnostics.clone());
    let mut router = MessageRouter::new(ctx);
    router.register_all_routes();

    let mut host = NativeMessagingHost::new(protocol, router);
    let outcome = host.run().await;

    if let Err(e) = &outcome {
        // The session log on stderr dies with the process; the
        // diagnostics file survives for post-mortem reading.
        diagnostics.record(&format!("fatal protocol error: {e}"));
    }
    outcome
}
