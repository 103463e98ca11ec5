//! Runtime configuration
//!
//! Every value comes from the process environment set by the deployment
//! (a local `.env` is loaded by the binaries before this runs).

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "anthropic.claude-3-5-sonnet-20240620-v1:0";
pub const DEFAULT_BEDROCK_REGION: &str = "us-west-2";
const DEFAULT_WORKFLOW_TIMEOUT_SECS: u64 = 300;
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_API_KEY_OWNER: &str = "local";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Connection details for the graph API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSyncConfig {
    pub endpoint: String,
    pub api_key: String,
}

/// How callers of the HTTP surface are identified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// The API gateway's identity authorizer already verified the token
    Gateway,
    /// Static bearer key; every caller acts as `owner`
    ApiKey { key: String, owner: String },
    /// Development only
    Disabled,
}

impl AuthMode {
    pub fn name(&self) -> &'static str {
        match self {
            AuthMode::Gateway => "gateway",
            AuthMode::ApiKey { .. } => "api-key",
            AuthMode::Disabled => "disabled",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` selects the in-memory store
    pub appsync: Option<AppSyncConfig>,
    pub model_id: String,
    pub bedrock_region: String,
    /// `None` selects the in-process workflow
    pub state_machine_arn: Option<String>,
    pub auth: AuthMode,
    pub workflow_timeout: Duration,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let appsync = match (get("APPSYNC_ENDPOINT"), get("APPSYNC_API_KEY")) {
            (Some(endpoint), Some(api_key)) => Some(AppSyncConfig { endpoint, api_key }),
            (Some(_), None) => return Err(ConfigError::Missing("APPSYNC_API_KEY")),
            (None, _) => None,
        };

        // Older deployments exported the region under a misspelled name.
        let bedrock_region = get("BEDROCK_REGION")
            .or_else(|| get("BEDROC_REGION"))
            .unwrap_or_else(|| DEFAULT_BEDROCK_REGION.to_string());

        let auth = match get("PROMPTGEN_AUTH_MODE").as_deref() {
            Some("gateway") => AuthMode::Gateway,
            Some("disabled") => AuthMode::Disabled,
            Some("api-key") => {
                api_key_mode(&get)?.ok_or(ConfigError::Missing("PROMPTGEN_API_KEY"))?
            }
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "PROMPTGEN_AUTH_MODE",
                    value: other.to_string(),
                    reason: "expected gateway, api-key or disabled".to_string(),
                })
            }
            None => match api_key_mode(&get)? {
                Some(mode) => mode,
                None if get("AWS_LAMBDA_FUNCTION_NAME").is_some() => AuthMode::Gateway,
                None => AuthMode::Disabled,
            },
        };

        let workflow_timeout = Duration::from_secs(parse_or(
            &get,
            "WORKFLOW_TIMEOUT_SECS",
            DEFAULT_WORKFLOW_TIMEOUT_SECS,
        )?);

        Ok(Self {
            appsync,
            model_id: get("ANTHROPIC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            bedrock_region,
            state_machine_arn: get("PROMPT_GENERATION_STATE_MACHINE_ARN"),
            auth,
            workflow_timeout,
            port: parse_or(&get, "PORT", DEFAULT_PORT)?,
        })
    }

    /// Deployed functions must not fall back to the in-memory store or the
    /// in-process workflow, whose state would be lost between invocations.
    pub fn require_deployed_backends(&self) -> Result<(), ConfigError> {
        if self.appsync.is_none() {
            return Err(ConfigError::Missing("APPSYNC_ENDPOINT"));
        }
        if self.state_machine_arn.is_none() {
            return Err(ConfigError::Missing("PROMPT_GENERATION_STATE_MACHINE_ARN"));
        }
        Ok(())
    }
}

fn api_key_mode<G>(get: &G) -> Result<Option<AuthMode>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    Ok(get("PROMPTGEN_API_KEY").map(|key| AuthMode::ApiKey {
        key,
        owner: get("PROMPTGEN_API_KEY_OWNER").unwrap_or_else(|| DEFAULT_API_KEY_OWNER.to_string()),
    }))
}

fn parse_or<G, T>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    G: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
