//! Command routing and failure containment.
//!
//! The router owns the two dispatch-tag registries (one per request
//! shape) and the collaborator handles every route needs. Its
//! `dispatch` is infallible by construction: unknown tags answer with
//! the defined "unknown command" result, and any error a handler
//! produces is recorded to diagnostics and converted to an empty
//! result. Nothing a request contains can take the session loop down.

use crate::config::HostConfig;
use crate::diagnostics::DiagnosticsSink;
use crate::error::{HostError, HostResult};
use crate::protocol::{DispatchTag, Request, Response};
use crate::route_trait::{HostRoute, RequestShape};
use crate::traits::WindowActivator;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Collaborators handed to every route handler.
pub struct RouteContext {
    /// Host configuration (picker argv, utility argv, limits).
    pub config: Arc<HostConfig>,

    /// Window activation call, injected so tests can substitute a
    /// recording fake.
    pub activator: Arc<dyn WindowActivator>,

    /// Failure log.
    pub diagnostics: Arc<dyn DiagnosticsSink>,
}

impl RouteContext {
    /// Bundle the collaborators.
    pub fn new(
        config: Arc<HostConfig>,
        activator: Arc<dyn WindowActivator>,
        diagnostics: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        Self {
            config,
            activator,
            diagnostics,
        }
    }
}

/// Type-erased route entry.
#[async_trait]
trait RouteDispatcher: Send + Sync {
    async fn dispatch(&self, param: Value, ctx: &RouteContext) -> HostResult<String>;
}

struct ConcreteRouteDispatcher<R: HostRoute> {
    _phantom: std::marker::PhantomData<R>,
}

impl<R: HostRoute> ConcreteRouteDispatcher<R> {
    fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

#[async_trait]
impl<R: HostRoute> RouteDispatcher for ConcreteRouteDispatcher<R> {
    async fn dispatch(&self, param: Value, ctx: &RouteContext) -> HostResult<String> {
        let request_id = uuid::Uuid::new_v4();

        tracing::debug!(
            request_id = %request_id,
            route = R::metadata().route_id,
            "dispatching to route handler"
        );

        let param: R::Param = serde_json::from_value(param)
            .map_err(|e| HostError::validation("param", format!("invalid parameter shape: {e}")))?;

        R::validate(&param)?;
        let result = R::handle(param, ctx).await?;

        tracing::debug!(
            request_id = %request_id,
            route = R::metadata().route_id,
            result_len = result.len(),
            "route handler completed"
        );

        Ok(result)
    }
}

/// Maps dispatch tags to handlers and contains their failures.
pub struct MessageRouter {
    cmd_routes: HashMap<String, Box<dyn RouteDispatcher>>,
    info_routes: HashMap<String, Box<dyn RouteDispatcher>>,
    ctx: RouteContext,
}

impl MessageRouter {
    /// Create an empty router around the given collaborators.
    pub fn new(ctx: RouteContext) -> Self {
        Self {
            cmd_routes: HashMap::new(),
            info_routes: HashMap::new(),
            ctx,
        }
    }

    /// Register one route under its metadata tag and shape.
    pub fn register_route<R: HostRoute>(&mut self) {
        let metadata = R::metadata();
        let dispatcher = Box::new(ConcreteRouteDispatcher::<R>::new());

        tracing::debug!(
            route_id = metadata.route_id,
            shape = ?metadata.shape,
            "registering route handler"
        );

        let registry = match metadata.shape {
            RequestShape::Cmd => &mut self.cmd_routes,
            RequestShape::Info => &mut self.info_routes,
        };
        registry.insert(metadata.route_id.to_string(), dispatcher);
    }

    /// Register every route the host answers.
    pub fn register_all_routes(&mut self) {
        self.register_route::<crate::routes::dmenu::DmenuRoute>();
        self.register_route::<crate::routes::tabs::SwitchTabRoute>();
        self.register_route::<crate::routes::downloads::ListDownloadsRoute>();
        self.register_route::<crate::routes::downloads::CopyDownloadRoute>();
        self.register_route::<crate::routes::history::OpenHistoryRoute>();
        self.register_route::<crate::routes::history::ChangeToPageRoute>();

        tracing::info!(
            route_count = self.cmd_routes.len() + self.info_routes.len(),
            "routes registered"
        );
    }

    /// Number of registered routes.
    pub fn route_count(&self) -> usize {
        self.cmd_routes.len() + self.info_routes.len()
    }

    /// Whether a tag is registered under the given shape.
    pub fn has_route(&self, shape: RequestShape, route_id: &str) -> bool {
        match shape {
            RequestShape::Cmd => self.cmd_routes.contains_key(route_id),
            RequestShape::Info => self.info_routes.contains_key(route_id),
        }
    }

    /// Dispatch one request to its handler and build the response
    /// envelope. Infallible: every failure mode has a defined
    /// response.
    pub async fn dispatch(&self, request: Request) -> Response {
        let Some(tag) = request.dispatch_tag() else {
            tracing::warn!("request carried neither 'cmd' nor an 'info' tag");
            self.ctx
                .diagnostics
                .record("request carried neither 'cmd' nor an 'info' tag");
            return Response::bare(String::new());
        };

        match tag {
            DispatchTag::Cmd(cmd) => match self.cmd_routes.get(&cmd) {
                Some(dispatcher) => {
                    let result = self.run_contained(&cmd, dispatcher.as_ref(), request.param).await;
                    Response::for_cmd(cmd, result, request.info)
                }
                None => Response::bare(format!("unknown command: {cmd}")),
            },
            DispatchTag::Info(tag) => match self.info_routes.get(&tag) {
                Some(dispatcher) => {
                    let result = self.run_contained(&tag, dispatcher.as_ref(), request.param).await;
                    Response::for_info(result, request.info)
                }
                None => Response::bare(format!("unknown command: {tag}")),
            },
        }
    }

    async fn run_contained(
        &self,
        route_id: &str,
        dispatcher: &dyn RouteDispatcher,
        param: Value,
    ) -> String {
        match dispatcher.dispatch(param, &self.ctx).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(route = route_id, error = %e, "handler failed; answering empty result");
                self.ctx
                    .diagnostics
                    .record(&format!("exception in {route_id}: {e}"));
                String::new()
            }
        }
    }
}
