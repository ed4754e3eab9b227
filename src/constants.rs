pub mod graph {
    pub const API_VERSION: &str = "v22.0";
    pub const API_BASE: &str = "https://graph.facebook.com/v22.0";
    pub const ACCESS_TOKEN_PARAM: &str = "access_token";
    pub const FILTERING_PARAM: &str = "filtering";
    pub const APP_TOKEN_SEPARATOR: char = '|';
}

pub mod network {
    pub const DEFAULT_PORT: u16 = 10_000;
    pub const TIMEOUT_GRAPH_REQUEST_MS: u64 = 30_000;
    pub const USER_AGENT: &str = "meta-pages-mcp/0.3";
}

pub mod limits {
    pub const COLLECTION_CEILING: i64 = 100;
    pub const IG_MEDIA_CEILING: i64 = 50;
    pub const CONVERSATIONS_CEILING: i64 = 50;
    pub const ACCOUNT_LISTING_LIMIT: &str = "100";
    pub const LEAD_FORMS_LIMIT: &str = "50";
    pub const LOG_SUBSTRING_LENGTH: usize = 200;
}

pub mod env {
    pub const USER_TOKEN: &str = "META_SYSTEM_USER_TOKEN";
    pub const PAGE_TOKENS: &str = "META_PAGE_TOKENS";
    pub const APP_ID: &str = "META_APP_ID";
    pub const APP_SECRET: &str = "META_APP_SECRET";
    pub const GRAPH_API_BASE: &str = "META_GRAPH_API_BASE";
    pub const REQUEST_TIMEOUT_MS: &str = "META_REQUEST_TIMEOUT_MS";
    pub const PORT: &str = "PORT";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
}
