pub mod config;
pub mod credentials;
pub mod graph_gateway;
pub mod logger;
pub mod tool_executor;
pub mod validation;
