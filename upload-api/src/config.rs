use crate::object_store::{
    AssetStore, FilesystemObjectStore, HttpObjectStore, ObjectStore, ObjectStoreError,
};
use letter_store::config::DocumentStore;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Listener and admin listener both bind {0}")]
    ListenerConflict(String),

    #[error("max_upload_bytes must be greater than 0")]
    InvalidUploadLimit,

    #[error("document_store.timeout_secs must be greater than 0")]
    InvalidTimeout,

    #[error("public_base_url cannot be used as a base URL: {0}")]
    InvalidPublicUrl(Url),
}

// 32 MiB
fn default_max_upload_bytes() -> usize {
    32 << 20
}

/// Upload service configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Listener for the upload API and static files
    pub listener: Listener,
    /// Listener for health and readiness probes
    pub admin_listener: Listener,
    /// Directory served for every path that is not an API route
    #[serde(default)]
    pub static_dir: Option<String>,
    /// Maximum accepted request body size
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Where uploaded image bytes are written
    pub object_store: ObjectStoreConfig,
    /// Where letter documents are kept
    pub document_store: DocumentStore,
}

impl Config {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.listener.validate()?;
        self.admin_listener.validate()?;

        if self.listener == self.admin_listener {
            return Err(ValidationError::ListenerConflict(self.listener.address()));
        }

        if self.max_upload_bytes == 0 {
            return Err(ValidationError::InvalidUploadLimit);
        }

        if self.document_store.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        self.object_store.validate()
    }
}

/// Network listener configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Listener {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
#[serde(tag = "type")]
pub enum ObjectStoreType {
    Filesystem { base_dir: String },
    /// Objects are sent with `PUT {endpoint}/{key}`.
    Http { endpoint: Url },
}

fn default_key_prefix() -> String {
    "assets".into()
}

fn default_object_timeout_secs() -> u64 {
    30
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ObjectStoreConfig {
    #[serde(flatten)]
    pub r#type: ObjectStoreType,
    /// Base of the image URLs recorded for each word
    pub public_base_url: Url,
    /// Prepended to every object key
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    #[serde(default = "default_object_timeout_secs")]
    pub timeout_secs: u64,
}

impl ObjectStoreConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.public_base_url.cannot_be_a_base() {
            return Err(ValidationError::InvalidPublicUrl(
                self.public_base_url.clone(),
            ));
        }
        if let ObjectStoreType::Http { endpoint } = &self.r#type
            && endpoint.cannot_be_a_base()
        {
            return Err(ValidationError::InvalidPublicUrl(endpoint.clone()));
        }
        Ok(())
    }

    pub fn build(&self) -> Result<AssetStore, ObjectStoreError> {
        let store: Arc<dyn ObjectStore> = match &self.r#type {
            ObjectStoreType::Filesystem { base_dir } => {
                Arc::new(FilesystemObjectStore::new(base_dir))
            }
            ObjectStoreType::Http { endpoint } => Arc::new(HttpObjectStore::new(
                endpoint.clone(),
                Duration::from_secs(self.timeout_secs),
            )?),
        };

        Ok(AssetStore::new(
            store,
            &self.key_prefix,
            self.public_base_url.clone(),
        ))
    }
}
