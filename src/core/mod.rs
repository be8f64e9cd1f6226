// Public modules
pub mod config;
pub mod error;
pub mod git;
pub mod lister;
pub mod output;
pub mod paths;
pub mod pruner;
pub mod run;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use output::{BulkResult, BulkSummary, ItemOutcome};
