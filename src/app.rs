use crate::errors::{GatewayError, GatewayResult};
use crate::managers;
use crate::mcp::catalog::tool_catalog;
use crate::services::config::GatewayConfig;
use crate::services::credentials::CredentialResolver;
use crate::services::graph_gateway::GraphGateway;
use crate::services::logger::Logger;
use crate::services::tool_executor::{ToolExecutor, ToolHandler};
use crate::services::validation::Validation;
use std::collections::HashMap;
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub config: Arc<GatewayConfig>,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    /// Every catalog tool must have a handler and every handler must be
    /// advertised in the catalog.
    fn validate_tool_wiring(handlers: &HashMap<String, Arc<dyn ToolHandler>>) -> GatewayResult<()> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| !handlers.contains_key(&tool.name))
            .map(|tool| tool.name.clone())
            .collect();
        let mut unlisted: Vec<String> = handlers
            .keys()
            .filter(|name| !tool_catalog().iter().any(|tool| &tool.name == *name))
            .cloned()
            .collect();
        if missing.is_empty() && unlisted.is_empty() {
            return Ok(());
        }
        missing.sort();
        unlisted.sort();
        Err(GatewayError::configuration(format!(
            "Tool wiring is incomplete (missing handlers: [{}]; handlers without catalog entry: [{}])",
            missing.join(", "),
            unlisted.join(", ")
        )))
    }

    pub fn initialize(logger: Logger, config: GatewayConfig) -> GatewayResult<Self> {
        let validation = Validation::new();
        let config = Arc::new(config);

        let resolver = Arc::new(CredentialResolver::new(logger.clone(), config.clone()));
        let gateway = Arc::new(GraphGateway::new(logger.clone(), config.clone()));

        let pages: Arc<dyn ToolHandler> = Arc::new(managers::pages::PagesManager::new(
            logger.clone(),
            validation.clone(),
            resolver.clone(),
            gateway.clone(),
        ));
        let comments: Arc<dyn ToolHandler> = Arc::new(managers::comments::CommentsManager::new(
            logger.clone(),
            validation.clone(),
            resolver.clone(),
            gateway.clone(),
        ));
        let ads: Arc<dyn ToolHandler> = Arc::new(managers::ads::AdsManager::new(
            validation.clone(),
            resolver.clone(),
            gateway.clone(),
        ));
        let instagram: Arc<dyn ToolHandler> = Arc::new(managers::instagram::InstagramManager::new(
            validation.clone(),
            resolver.clone(),
            gateway.clone(),
        ));
        let messaging: Arc<dyn ToolHandler> = Arc::new(managers::messaging::MessagingManager::new(
            logger.clone(),
            validation.clone(),
            resolver.clone(),
            gateway.clone(),
        ));
        let leads: Arc<dyn ToolHandler> = Arc::new(managers::leads::LeadsManager::new(
            validation.clone(),
            resolver.clone(),
            gateway.clone(),
        ));
        let insights: Arc<dyn ToolHandler> = Arc::new(managers::insights::InsightsManager::new(
            validation.clone(),
            resolver.clone(),
            gateway.clone(),
        ));
        let webhooks: Arc<dyn ToolHandler> = Arc::new(managers::webhooks::WebhooksManager::new(
            validation.clone(),
            resolver.clone(),
            gateway.clone(),
        ));
        let utility: Arc<dyn ToolHandler> = Arc::new(managers::utility::UtilityManager::new(
            logger.clone(),
            validation,
            resolver,
            gateway,
        ));

        let mut handlers: HashMap<String, Arc<dyn ToolHandler>> = HashMap::new();
        let areas: [(&[&str], &Arc<dyn ToolHandler>); 9] = [
            (managers::pages::TOOLS, &pages),
            (managers::comments::TOOLS, &comments),
            (managers::ads::TOOLS, &ads),
            (managers::instagram::TOOLS, &instagram),
            (managers::messaging::TOOLS, &messaging),
            (managers::leads::TOOLS, &leads),
            (managers::insights::TOOLS, &insights),
            (managers::webhooks::TOOLS, &webhooks),
            (managers::utility::TOOLS, &utility),
        ];
        for (tools, handler) in areas {
            for tool in tools {
                handlers.insert((*tool).to_string(), Arc::clone(handler));
            }
        }

        Self::validate_tool_wiring(&handlers)?;
        logger.info(
            "tool handlers registered",
            Some(&serde_json::json!({ "tools": handlers.len() })),
        );

        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), handlers));
        Ok(Self {
            logger,
            config,
            tool_executor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_tool_is_wired() {
        let app = App::initialize(Logger::new("test"), GatewayConfig::default()).expect("app");
        for tool in tool_catalog() {
            assert!(app.tool_executor.has_handler(&tool.name), "{} has no handler", tool.name);
        }
    }

    #[test]
    fn wiring_check_reports_missing_handlers() {
        let err = App::validate_tool_wiring(&HashMap::new()).expect_err("nothing wired");
        assert!(err.to_string().contains("meta_graph_api_call"));
    }
}
