use crate::infrastructure::config::WhisprConfig;
use crate::infrastructure::whispr_api::WhisprApiClient;
use std::sync::Arc;
use whispr_errors::AppError;

/// Server-side state shared by every request and server function.
#[derive(Clone)]
pub struct AppContext {
    pub api: WhisprApiClient,
    pub config: Arc<WhisprConfig>,
}

impl AppContext {
    pub fn new(config: WhisprConfig) -> Result<Self, AppError> {
        let api = WhisprApiClient::new(&config)?;
        Ok(Self {
            api,
            config: Arc::new(config),
        })
    }

    pub fn from_env() -> Result<Self, AppError> {
        let config = WhisprConfig::from_env()?;
        tracing::info!("Using Whispr API at {}", config.api_url);
        Self::new(config)
    }

    /// API client acting on behalf of the browser that sent `auth_token`.
    pub fn api_for(&self, auth_token: Option<String>) -> WhisprApiClient {
        self.api.with_auth_token(auth_token)
    }
}
