//! The `switchTab` route: pick one of the currently open tabs.
//!
//! The extension sends tab titles in `opts` and the matching numeric
//! tab ids in `tabIds`; the resolved id goes back so the extension can
//! focus that tab. Text typed past the option list comes back with the
//! search prefix so the extension opens it as a query instead.

use crate::error::HostResult;
use crate::route_trait::{HostRoute, RequestShape, RouteMetadata};
use crate::router::RouteContext;
use crate::routes::{run_selection, validate_picker_param, PickerParam};
use async_trait::async_trait;

/// Picker over open tabs.
pub struct SwitchTabRoute;

#[async_trait]
impl HostRoute for SwitchTabRoute {
    type Param = PickerParam;

    fn metadata() -> RouteMetadata {
        RouteMetadata {
            route_id: "switchTab",
            shape: RequestShape::Info,
            description: "Pick an open tab and answer its id",
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
