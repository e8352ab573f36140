//! Route handlers for every command the host answers.
//!
//! The picker-backed routes (dmenu, switchTab, openHistory,
//! changeToPage) all share one flow: build the picker argv, feed it
//! the option list, treat an empty selection as cancellation, bring
//! the browser window forward, and resolve the selection. That flow
//! lives here; the per-route files add metadata and validation.

pub mod dmenu;
pub mod downloads;
pub mod history;
pub mod tabs;

use crate::error::{HostError, HostResult};
use crate::router::RouteContext;
use crate::selection::resolve_selection;
use serde::Deserialize;
use serde_json::Value;

/// Parameters of a picker invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct PickerParam {
    /// Option lines shown to the user; order is meaningful and is
    /// preserved on the picker's stdin.
    pub opts: Vec<String>,

    /// Extra picker arguments supplied by the extension, appended
    /// after the configured base arguments.
    #[serde(rename = "rofi-opts", default)]
    pub rofi_opts: Vec<String>,

    /// Identifiers positionally aligned with `opts`. May be shorter
    /// than `opts` or absent; may hold numbers (browser tab ids).
    #[serde(rename = "tabIds", default)]
    pub tab_ids: Vec<Value>,
}

/// Reject option lines that would corrupt the picker's line protocol.
pub(crate) fn validate_picker_param(param: &PickerParam) -> HostResult<()> {
    if let Some(index) = param.opts.iter().position(|opt| opt.contains('\n')) {
        return Err(HostError::validation(
            "opts",
            format!("option {index} contains a newline"),
        ));
    }
    Ok(())
}

/// Run the picker over `opts` and return its raw output and exit
/// code.
pub(crate) async fn invoke_picker(
    param: &PickerParam,
    ctx: &RouteContext,
) -> HostResult<rofi_picker::CommandOutput> {
    let picker = &ctx.config.picker;
    let mut args = picker.base_args.clone();
    args.extend(param.rofi_opts.iter().cloned());

    let output = rofi_picker::run_with_input(&picker.program, &args, &param.opts.join("\n")).await?;
    Ok(output)
}

/// The shared selection flow: pick, detect cancellation, activate the
/// browser window, resolve the selection into a result string.
pub(crate) async fn run_selection(param: PickerParam, ctx: &RouteContext) -> HostResult<String> {
    let output = invoke_picker(&param, ctx).await?;
    let choice = output.trimmed();

    if choice.is_empty() {
        // User dismissed the picker: empty result, no activation.
        return Ok(String::new());
    }

    // Bring the browser forward before computing the result; the side
    // effect does not depend on which branch resolves below.
    ctx.activator.activate().await.map_err(HostError::Activation)?;

    Ok(resolve_selection(choice, &param.opts, &param.tab_ids))
}

/// Feed `input` to the configured copy utility.
pub(crate) async fn run_copy(input: &str, ctx: &RouteContext) -> HostResult<()> {
    let (program, args) = ctx
        .config
        .utilities
        .copy_argv()
        .ok_or_else(|| HostError::validation("utilities.copy", "argv is empty"))?;
    rofi_picker::feed_utility(program, args, Some(input)).await?;
    Ok(())
}

/// Hand `target` to the configured open utility as its final
/// argument.
pub(crate) async fn run_open(target: &str, ctx: &RouteContext) -> HostResult<()> {
    let (program, args) = ctx
        .config
        .utilities
        .open_argv()
        .ok_or_else(|| HostError::validation("utilities.open", "argv is empty"))?;

    let mut full_args: Vec<String> = args.to_vec();
    full_args.push(target.to_string());
    rofi_picker::feed_utility(program, &full_args, None).await?;
    Ok(())
}
