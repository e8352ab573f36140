//! Resolution of a picker selection into a result value.
//!
//! The picker echoes back one of the offered option lines, or free
//! text the user typed. Mapping that back to an answer has three
//! explicit branches: the selection matches an option with an aligned
//! tab id, it matches an option past the end of the id list, or it
//! matches nothing.

use serde_json::Value;

/// Delimiter option strings use to embed a raw identifier after the
/// display text (`"<title> ::: <url>"`).
pub const ID_DELIMITER: &str = " ::: ";

/// Prefix marking a result as free text the caller should treat as a
/// "go to / create new" request.
pub const CUSTOM_TEXT_PREFIX: &str = "g ";

/// Resolve a non-empty, trimmed picker selection against the offered
/// options.
///
/// - Found at `i` with `i < tab_ids.len()`: the aligned id,
///   stringified (the extension sends numeric tab ids).
/// - Found but out of range of `tab_ids` (or `tab_ids` empty): the
///   text after the last `" ::: "`, or the whole selection when the
///   delimiter is absent.
/// - Not found verbatim: the selection prefixed with `"g "`.
pub fn resolve_selection(choice: &str, opts: &[String], tab_ids: &[Value]) -> String {
    match opts.iter().position(|opt| opt == choice) {
        Some(index) if index < tab_ids.len() => id_as_string(&tab_ids[index]),
        Some(_) => trailing_id(choice).to_string(),
        None => format!("{CUSTOM_TEXT_PREFIX}{choice}"),
    }
}

/// The segment after the last `" ::: "`, or the whole string when the
/// delimiter does not occur.
fn trailing_id(choice: &str) -> &str {
    match choice.rfind(ID_DELIMITER) {
        Some(pos) => &choice[pos + ID_DELIMITER.len()..],
        None => choice,
    }
}

/// Render a tab id for the string-typed `result` field. String ids
/// pass through unquoted; numbers and other scalars use their JSON
/// rendering.
pub fn id_as_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
