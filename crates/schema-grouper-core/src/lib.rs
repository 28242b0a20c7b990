pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod progress;
pub mod scanner;
pub mod schema;
pub mod storage;

pub use analysis::{Group, Groups};
pub use config::AppConfig;
pub use engine::{GroupingSession, ScanFailure, ScanReport};
pub use error::{BoxError, Error, Result};
pub use progress::{ProgressReporter, SilentReporter};
pub use schema::{FieldType, FileSchema};
pub use storage::{GroupStore, ProcessOutcome};
