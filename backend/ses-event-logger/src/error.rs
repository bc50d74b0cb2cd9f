use cloudwatch_logs::LogClientError;
use thiserror::Error;

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Failures that abort a whole invocation; the transport redelivers the batch
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Log destination setup failed: {0}")]
    Setup(#[source] LogClientError),

    #[error("Failed to process record {index}: {source}")]
    Append {
        index: usize,
        #[source]
        source: LogClientError,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment configuration: {0}")]
    Env(#[from] envy::Error),
}
