use minigql::engine::Response;

pub(crate) const GREEN_CHECK: &str = "\u{2705}";
pub(crate) const RED_X: &str = "\u{274c}";

/// Serializes a response envelope on one line, or indented with `pretty`.
pub(crate) fn format_response(response: &Response, pretty: bool) -> String {
    let json = response.to_json();
    let formatted = if pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    };
    formatted.unwrap_or_else(|err| format!("{RED_X} failed to serialize response: {err}"))
}
