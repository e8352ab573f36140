//! History routes: pick a history entry, and pick a page-function
//! target. Both are plain selection flows over extension-provided
//! options.

use crate::error::HostResult;
use crate::route_trait::{HostRoute, RequestShape, RouteMetadata};
use crate::router::RouteContext;
use crate::routes::{run_selection, validate_picker_param, PickerParam};
use async_trait::async_trait;

/// Picker over browser history entries.
pub struct OpenHistoryRoute;

#[async_trait]
impl HostRoute for OpenHistoryRoute {
    type Param = PickerParam;

    fn metadata() -> RouteMetadata {
        RouteMetadata {
            route_id: "openHistory",
            shape: RequestShape::Info,
            description: "Pick a history entry to open",
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

/// Picker over targets for an extension-side page function (e.g. open
/// a bookmark in the current tab).
pub struct ChangeToPageRoute;

#[async_trait]
impl HostRoute for ChangeToPageRoute {
    type Param = PickerParam;

    fn metadata() -> RouteMetadata {
        RouteMetadata {
            route_id: "changeToPage",
            shape: RequestShape::Info,
            description: "Pick a page for the extension to act on",
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
