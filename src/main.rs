use clap::{Parser, ValueEnum};
use meta_pages_mcp::mcp::{http, server};
use meta_pages_mcp::services::config::GatewayConfig;
use meta_pages_mcp::services::logger::{LogLevel, Logger};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Transport {
    Stdio,
    Http,
}

#[derive(Debug, Parser)]
#[command(name = "meta-pages-mcp")]
#[command(about = "MCP server for Meta Pages, Ads, Instagram and Messenger via the Graph API")]
struct Cli {
    #[arg(long, value_enum, default_value_t = Transport::Http)]
    transport: Transport,
    /// Overrides PORT for the HTTP transport.
    #[arg(long)]
    port: Option<u16>,
    /// Overrides LOG_LEVEL (error, warn, info, debug).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let mut logger = Logger::new("meta-pages");
    if let Some(level) = cli.log_level.as_deref() {
        logger.set_level(LogLevel::parse(level));
    }

    let result = async {
        let mut config = GatewayConfig::from_env(&logger)?;
        if let Some(port) = cli.port {
            config = config.with_port(port);
        }
        match cli.transport {
            Transport::Stdio => server::run_stdio(logger.clone(), config).await,
            Transport::Http => http::run_http(logger.clone(), config).await,
        }
    }
    .await;

    if let Err(err) = result {
        logger.error("fatal", Some(&serde_json::json!({ "kind": err.kind(), "error": err.to_string() })));
        std::process::exit(1);
    }
}
