//! The `dmenu` route: general-purpose picker over caller-provided
//! options, addressed through the legacy `cmd` envelope.

use crate::error::HostResult;
use crate::route_trait::{HostRoute, RequestShape, RouteMetadata};
use crate::router::RouteContext;
use crate::routes::{run_selection, validate_picker_param, PickerParam};
use async_trait::async_trait;

/// Picker-backed menu over arbitrary options.
pub struct DmenuRoute;

#[async_trait]
impl HostRoute for DmenuRoute {
    type Param = PickerParam;

    fn metadata() -> RouteMetadata {
        RouteMetadata {
            route_id: "dmenu",
            shape: RequestShape::Cmd,
            description: "Show a picker over caller-provided options",
            invokes_picker: true,
        }
    }

    fn validate(param: &Self::Param) -> HostResult<()> {
        validate_picker_param(param)
    }

    async fn handle(param: Self::Param, ctx: &RouteContext) -> HostResult<String> {
        run_selection(param, ctx).await
    }
}
