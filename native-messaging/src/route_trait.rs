//! Route handler trait for host commands.
//!
//! Every command the host answers is a type implementing
//! [`HostRoute`]: a typed parameter, metadata naming the dispatch tag
//! and request shape, real validation, and an async handler. The
//! router stores routes type-erased and feeds them the raw JSON
//! `param` value.

use crate::error::HostResult;
use crate::router::RouteContext;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// Which request envelope addresses a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestShape {
    /// Legacy shape, dispatched on the `cmd` field.
    Cmd,
    /// Current shape, dispatched on the string `info` field.
    Info,
}

/// Route metadata: dispatch tag, shape, and documentation.
#[derive(Debug, Clone)]
pub struct RouteMetadata {
    /// Dispatch tag the extension sends (e.g. "dmenu", "switchTab").
    pub route_id: &'static str,

    /// Which request shape carries this route.
    pub shape: RequestShape,

    /// Human-readable description.
    pub description: &'static str,

    /// Whether handling spawns the interactive picker (and therefore
    /// blocks on the user).
    pub invokes_picker: bool,
}

/// A command handler.
#[async_trait]
pub trait HostRoute: Send + Sync + 'static {
    /// Parameter type, deserialized from the request's `param` field.
    type Param: DeserializeOwned + Debug + Send;

    /// Route metadata.
    fn metadata() -> RouteMetadata;

    /// Check the parameter before handling. Failures are contained by
    /// the router: logged to diagnostics and answered with an empty
    /// result.
    fn validate(param: &Self::Param) -> HostResult<()>;

    /// Execute the command and produce the `result` string.
    ///
    /// # Errors
    ///
    /// Any error is contained by the router; it never reaches the
    /// session loop.
    async fn handle(param: Self::Param, ctx: &RouteContext) -> HostResult<String>;
}
