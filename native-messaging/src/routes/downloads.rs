//! Download routes: pick a download to copy or open, and copy a
//! download path the extension already resolved.

use crate::error::{HostError, HostResult};
use crate::route_trait::{HostRoute, RequestShape, RouteMetadata};
use crate::router::RouteContext;
use crate::routes::{invoke_picker, run_copy, run_open, validate_picker_param, PickerParam};
use async_trait::async_trait;

/// Picker exit code rofi reports for the first custom keybinding.
const OPEN_EXIT_CODE: i32 = 10;

/// Picker over recent downloads. Plain accept copies the selection;
/// the custom keybinding opens it instead.
pub struct ListDownloadsRoute;

#[async_trait]
impl HostRoute for ListDownloadsRoute {
    type Param = PickerParam;

    fn metadata() -> RouteMetadata {
        RouteMetadata {
            route_id: "listDownloads",
            shape: RequestShape::Info,
            description: "Pick a download to copy or open",
            invokes_picker: true,
        }
    }

    fn validate(param: &Self::Param) -> HostResult<()> {
        validate_picker_param(param)
    }

    async fn handle(param: Self::Param, ctx: &RouteContext) -> HostResult<String> {
        let output = invoke_picker(&param, ctx).await?;

        match output.status {
            // Plain accept: hand the picker output to the clipboard as
            // is. The trailing newline is part of what rofi printed.
            0 => run_copy(&output.stdout, ctx).await?,
            OPEN_EXIT_CODE => {
                let target = output.trimmed();
                if !target.is_empty() {
                    run_open(target, ctx).await?;
                }
            }
            // Dismissal or an unbound key; nothing to do.
            _ => {}
        }

        // The extension ignores the body; the response only signals
        // completion.
        Ok(String::new())
    }
}

/// Copy an already-resolved download path or URL to the clipboard.
pub struct CopyDownloadRoute;

#[async_trait]
impl HostRoute for CopyDownloadRoute {
    type Param = String;

    fn metadata() -> RouteMetadata {
        RouteMetadata {
            route_id: "copyDownload",
            shape: RequestShape::Info,
            description: "Copy a download path to the clipboard",
            invokes_picker: false,
        }
    }

    fn validate(param: &Self::Param) -> HostResult<()> {
        if param.is_empty() {
            return Err(HostError::validation("param", "download path is empty"));
        }
        Ok(())
    }

    async fn handle(param: Self::Param, ctx: &RouteContext) -> HostResult<String> {
        run_copy(&param, ctx).await?;
        Ok(String::new())
    }
}
