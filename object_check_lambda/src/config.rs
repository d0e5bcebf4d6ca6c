//! Process-wide configuration, loaded once at cold start.
//!
//! Credentials, region and endpoint come from the standard AWS provider
//! chain. The only setting owned by this function is
//! `S3_FORCE_PATH_STYLE`, used with S3-compatible endpoints
//! (`AWS_ENDPOINT_URL`).

use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::Client as S3Client;

use crate::error::ConfigError;

const FORCE_PATH_STYLE_VAR: &str = "S3_FORCE_PATH_STYLE";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LambdaConfig {
    pub force_path_style: bool,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let force_path_style = match lookup(FORCE_PATH_STYLE_VAR) {
            Some(value) => parse_flag(FORCE_PATH_STYLE_VAR, &value)?,
            None => false,
        };
        Ok(Self { force_path_style })
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" => Ok(false),
        "1" | "true" => Ok(true),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}

/// S3 client settings owned by this Lambda. Retries are disabled: every
/// invocation makes exactly one GetObject attempt.
pub fn configure_s3(builder: S3ConfigBuilder, config: &LambdaConfig) -> S3ConfigBuilder {
    builder
        .retry_config(RetryConfig::disabled())
        .force_path_style(config.force_path_style)
}

/// Builds the shared S3 client from the ambient AWS configuration.
pub async fn load_s3_client(config: &LambdaConfig) -> Result<S3Client, ConfigError> {
    let shared_config = aws_config::load_defaults(BehaviorVersion::v2025_01_17()).await;
    if shared_config.region().is_none() {
        return Err(ConfigError::MissingRegion);
    }
    let s3_config = configure_s3(S3ConfigBuilder::from(&shared_config), config).build();
    Ok(S3Client::from_conf(s3_config))
}
