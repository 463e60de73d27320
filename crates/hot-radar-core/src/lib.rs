pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod progress;
pub mod ranker;
pub mod report;
pub mod source;
pub mod storage;

pub use self::config::AppConfig;
pub use engine::{CycleOutcome, CycleResult, MonitorEngine};
pub use error::Error;
pub use progress::{ProgressReporter, SilentReporter};
