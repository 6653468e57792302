//! Client configuration

use crate::{ClientError, ClientResult};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default table holding the link rows
pub const DEFAULT_LINKS_TABLE: &str = "links";

/// Default RPC performing the transactional batch reorder
pub const DEFAULT_REORDER_RPC: &str = "reorder_links";

/// Client configuration for connecting to the hosted Postgres REST service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Project base URL (e.g., "https://xyz.supabase.co")
    pub base_url: String,

    /// Project API key, sent as `apikey` on every request
    pub api_key: String,

    /// Signed-in admin's access token (falls back to the API key)
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Table the links live in
    pub links_table: String,

    /// Name of the batch reorder RPC
    pub reorder_rpc: String,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            links_table: DEFAULT_LINKS_TABLE.to_string(),
            reorder_rpc: DEFAULT_REORDER_RPC.to_string(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// `SUPABASE_URL` and `SUPABASE_ANON_KEY` are required; the rest are optional.
    pub fn from_env() -> ClientResult<Self> {
        let base_url = required_env("SUPABASE_URL")?;
        let api_key = required_env("SUPABASE_ANON_KEY")?;

        let mut config = Self::new(base_url, api_key);
        config.token = std::env::var("SUPABASE_ACCESS_TOKEN")
            .ok()
            .filter(|s| !s.is_empty());
        config.timeout = std::env::var("ADMIN_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if let Ok(table) = std::env::var("ADMIN_LINKS_TABLE")
            && !table.is_empty()
        {
            config.links_table = table;
        }
        if let Ok(rpc) = std::env::var("ADMIN_REORDER_RPC")
            && !rpc.is_empty()
        {
            config.reorder_rpc = rpc;
        }

        Ok(config)
    }

    /// Set the access token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the links table name
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.links_table = table.into();
        self
    }

    /// Set the reorder RPC name
    pub fn with_reorder_rpc(mut self, rpc: impl Into<String>) -> Self {
        self.reorder_rpc = rpc.into();
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<super::HttpClient> {
        super::HttpClient::new(self)
    }
}

fn required_env(name: &str) -> ClientResult<String> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(ClientError::Config(format!("{name} must be set"))),
    }
}
