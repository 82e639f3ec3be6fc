use crate::filesystem::FilesystemLetterStore;
use crate::gateway::{MemoryLetterStore, PersistenceGateway, WithTimeout};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "lowercase")]
#[serde(tag = "type")]
pub enum DocumentStoreType {
    Memory,
    Filesystem { base_dir: String },
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct DocumentStore {
    #[serde(flatten)]
    pub r#type: DocumentStoreType,
    /// Upper bound for every call made to the store.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl DocumentStore {
    pub fn build(&self) -> Arc<dyn PersistenceGateway> {
        let timeout = Duration::from_secs(self.timeout_secs);
        match &self.r#type {
            DocumentStoreType::Memory => {
                tracing::warn!("Using the in-memory document store, letters are lost on restart");
                Arc::new(WithTimeout::new(MemoryLetterStore::new(), timeout))
            }
            DocumentStoreType::Filesystem { base_dir } => Arc::new(WithTimeout::new(
                FilesystemLetterStore::new(base_dir),
                timeout,
            )),
        }
    }
}
