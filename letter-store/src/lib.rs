pub mod config;
pub mod filesystem;
pub mod gateway;
pub mod grouper;
pub mod merge;
pub mod metrics_defs;
pub mod types;

pub use gateway::{PersistError, PersistenceGateway};
pub use merge::{Decision, MergeOutcome, merge};
pub use types::{LetterAggregate, UploadedWord, WordRecord};
