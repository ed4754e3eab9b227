mod gateway_error;
mod mcp_error;

pub use gateway_error::{GatewayError, GatewayResult};
pub use mcp_error::{ErrorCode, McpError};
