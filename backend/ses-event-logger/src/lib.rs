pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod sns;
pub mod telemetry;

pub use config::{Config, LogFormat};
pub use dispatcher::{BatchSummary, Dispatcher, RecordOutcome};
pub use error::{ConfigError, DispatchError, DispatchResult};
pub use handler::{handle_invocation, InvocationContext, InvocationResponse};
pub use sns::{SnsEvent, SnsEventRecord, SnsMessage};
