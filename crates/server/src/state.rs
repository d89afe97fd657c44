use crate::error::ApiError;
use databank_core::{AppConfig, AppResult};
use databank_knowledge::AnswerPipeline;
use databank_llm::client_from_config;
use databank_quota::QuotaGovernor;
use std::sync::Arc;

/// Shared state handed to every route.
#[derive(Clone)]
pub struct ServerState {
    pub quota: Arc<QuotaGovernor>,
    /// The answer pipeline, or why the backend could not be configured.
    pipeline: Result<Arc<AnswerPipeline>, String>,
}

impl ServerState {
    pub fn new(quota: Arc<QuotaGovernor>, pipeline: Arc<AnswerPipeline>) -> Self {
        Self {
            quota,
            pipeline: Ok(pipeline),
        }
    }

    /// State whose answer requests all fail with a configuration error.
    pub fn unconfigured(quota: Arc<QuotaGovernor>, reason: impl Into<String>) -> Self {
        Self {
            quota,
            pipeline: Err(reason.into()),
        }
    }

    /// Build state from configuration.
    ///
    /// A missing backend credential does not fail startup; it is reported on
    /// each answer request instead.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let quota = Arc::new(QuotaGovernor::new(config.daily_limit)?);

        match client_from_config(config) {
            Ok(client) => {
                let pipeline = AnswerPipeline::from_config(config, client)?;
                tracing::info!(
                    provider = %config.provider,
                    model = %config.model,
                    materials = %pipeline.catalog().root().display(),
                    "Answer pipeline ready"
                );
                Ok(Self::new(quota, Arc::new(pipeline)))
            }
            Err(reason) => {
                tracing::warn!(
                    provider = %config.provider,
                    reason = %reason,
                    "Backend unavailable; answer requests will fail"
                );
                Ok(Self::unconfigured(quota, reason))
            }
        }
    }

    pub(crate) fn pipeline(&self) -> Result<&Arc<AnswerPipeline>, ApiError> {
        self.pipeline.as_ref().map_err(|reason| {
            tracing::error!(reason = %reason, "Backend is not configured");
            ApiError::Config(reason.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use databank_core::config::{LlmConfig, ProviderConfig};
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_from_config_with_local_backend() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig {
            workspace: temp.path().to_path_buf(),
            provider: "ollama".to_string(),
            daily_limit: 5,
            ..AppConfig::default()
        };

        let state = ServerState::from_config(&config).unwrap();

        assert!(state.pipeline().is_ok());
        assert_eq!(state.quota.limit(), 5);
    }

    #[test]
    fn test_from_config_without_key_still_starts() {
        let temp = TempDir::new().unwrap();
        let mut providers = HashMap::new();
        providers.insert(
            "gemini".to_string(),
            ProviderConfig::Gemini {
                api_key_env: "DATABANK_STATE_TEST_UNSET_KEY".to_string(),
                model: "gemini-2.5-flash".to_string(),
                endpoint: None,
            },
        );
        let config = AppConfig {
            workspace: temp.path().to_path_buf(),
            llm: Some(LlmConfig {
                active_provider: "gemini".to_string(),
                providers,
            }),
            ..AppConfig::default()
        };

        let state = ServerState::from_config(&config).unwrap();

        match state.pipeline() {
            Err(ApiError::Config(reason)) => {
                assert_eq!(reason, "DATABANK_STATE_TEST_UNSET_KEY is not set")
            }
            _ => panic!("Expected a configuration error"),
        }
    }

    #[test]
    fn test_from_config_rejects_zero_limit() {
        let config = AppConfig {
            daily_limit: 0,
            provider: "ollama".to_string(),
            ..AppConfig::default()
        };
        assert!(ServerState::from_config(&config).is_err());
    }
}
