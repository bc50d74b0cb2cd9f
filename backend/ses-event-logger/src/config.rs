use crate::error::ConfigError;
use cloudwatch_logs::LogDestination;
use serde::Deserialize;

const DEFAULT_STAGE: &str = "dev";
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_LOG_STREAM: &str = "ses-events";

/// Process configuration, read once at startup.
///
/// Environment variables:
/// - STAGE: deployment stage (default: "dev")
/// - AWS_REGION: CloudWatch Logs region (default: "us-east-1")
/// - LOG_GROUP_NAME: log group override (default: "/ses/<stage>/events")
/// - LOG_STREAM_NAME: log stream (default: "ses-events")
/// - SENTRY_DSN: error-telemetry credential (optional)
/// - LOG_FORMAT: "text" or "json" (default: "text")
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_stage")]
    pub stage: String,
    #[serde(default = "default_region")]
    pub aws_region: String,
    #[serde(default)]
    pub log_group_name: Option<String>,
    #[serde(default = "default_log_stream")]
    pub log_stream_name: String,
    #[serde(default)]
    pub sentry_dsn: Option<String>,
    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(envy::from_env::<Config>()?.cleaned())
    }

    /// Build from explicit `(NAME, value)` pairs
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter::<_, Config>(vars)?.cleaned())
    }

    /// Log group receiving the events
    pub fn log_group(&self) -> String {
        self.log_group_name
            .clone()
            .unwrap_or_else(|| format!("/ses/{}/events", self.stage))
    }

    pub fn destination(&self) -> LogDestination {
        LogDestination::new(self.log_group(), self.log_stream_name.clone())
    }

    pub fn telemetry_enabled(&self) -> bool {
        self.sentry_dsn.is_some()
    }

    // Blank values behave like unset ones
    fn cleaned(mut self) -> Self {
        self.log_group_name = self.log_group_name.filter(|v| !v.trim().is_empty());
        self.sentry_dsn = self.sentry_dsn.filter(|v| !v.trim().is_empty());
        if self.stage.trim().is_empty() {
            self.stage = default_stage();
        }
        self
    }
}

fn default_stage() -> String {
    DEFAULT_STAGE.to_string()
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_log_stream() -> String {
    DEFAULT_LOG_STREAM.to_string()
}
