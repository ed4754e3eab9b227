pub mod filtering;
pub mod params;
pub mod redact;
pub mod suggest;
pub mod tool_errors;
