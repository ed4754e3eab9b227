pub mod catalog;
pub mod http;
pub mod protocol;
pub mod server;
