use crate::errors::GatewayError;
use crate::utils::suggest::suggest;

/// Error for a tool name routed to a handler that does not serve it.
pub fn unknown_tool_error(area: &str, tool: &str, known_tools: &[&str]) -> GatewayError {
    let known: Vec<String> = known_tools.iter().map(|s| s.to_string()).collect();
    let suggestions = suggest(tool, &known, 3);
    let mut message = format!("Unknown {} tool: {}.", area, tool);
    if !suggestions.is_empty() {
        message.push_str(&format!(" Did you mean: {}?", suggestions.join(", ")));
    }
    if !known.is_empty() {
        message.push_str(&format!(" Use one of: {}.", known.join(", ")));
    }
    GatewayError::validation(message)
}
