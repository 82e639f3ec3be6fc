//! Object stores hold the raw bytes of uploaded images. The upload pipeline
//! only needs the public URL of each stored object.
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(thiserror::Error, Debug)]
pub enum ObjectStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("object store answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid object path: {0:?}")]
    InvalidKey(String),

    #[error("cannot append a key to URL {0}")]
    CannotBeABase(Url),
}

/// A normalized, `/`-separated object key.
///
/// Empty and `.` segments are dropped. A `..` segment is rejected so that a key
/// can never escape its prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectKey {
    segments: Vec<String>,
}

impl ObjectKey {
    pub fn new(prefix: &str, path: &str) -> Result<Self, ObjectStoreError> {
        let path_segments =
            normalize(path).ok_or_else(|| ObjectStoreError::InvalidKey(path.into()))?;
        if path_segments.is_empty() {
            return Err(ObjectStoreError::InvalidKey(path.into()));
        }
        let mut segments =
            normalize(prefix).ok_or_else(|| ObjectStoreError::InvalidKey(prefix.into()))?;
        segments.extend(path_segments);
        Ok(ObjectKey { segments })
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Appends the key to `base`, percent-encoding each segment.
    pub fn append_to(&self, base: &Url) -> Result<Url, ObjectStoreError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| ObjectStoreError::CannotBeABase(base.clone()))?
            .pop_if_empty()
            .extend(self.segments());
        Ok(url)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

fn normalize(path: &str) -> Option<Vec<String>> {
    let mut segments = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s => segments.push(s.to_string()),
        }
    }
    Some(segments)
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &ObjectKey, body: Bytes) -> Result<(), ObjectStoreError>;
}

pub struct FilesystemObjectStore {
    base_dir: PathBuf,
}

impl FilesystemObjectStore {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        FilesystemObjectStore {
            base_dir: base_dir.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn put(&self, key: &ObjectKey, body: Bytes) -> Result<(), ObjectStoreError> {
        let path: PathBuf = key
            .segments()
            .fold(self.base_dir.clone(), |path, segment| path.join(segment));
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &body).await?;
        Ok(())
    }
}

pub struct HttpObjectStore {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpObjectStore {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, ObjectStoreError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpObjectStore { client, endpoint })
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(&self, key: &ObjectKey, body: Bytes) -> Result<(), ObjectStoreError> {
        let url = key.append_to(&self.endpoint)?;
        let response = self.client.put(url).body(body).send().await?;

        if !response.status().is_success() {
            return Err(ObjectStoreError::Status(response.status()));
        }
        Ok(())
    }
}

/// Stores image bytes under a key prefix and derives their public URLs.
#[derive(Clone)]
pub struct AssetStore {
    store: Arc<dyn ObjectStore>,
    key_prefix: String,
    public_base_url: Url,
}

impl AssetStore {
    pub fn new(store: Arc<dyn ObjectStore>, key_prefix: &str, public_base_url: Url) -> Self {
        AssetStore {
            store,
            key_prefix: key_prefix.to_string(),
            public_base_url,
        }
    }

    /// Writes `body` at `{key_prefix}/{path}` and returns its public URL.
    pub async fn store(&self, path: &str, body: Bytes) -> Result<Url, ObjectStoreError> {
        let key = ObjectKey::new(&self.key_prefix, path)?;
        let public_url = key.append_to(&self.public_base_url)?;
        self.store.put(&key, body).await?;
        tracing::debug!(key = %key, "Stored object");
        Ok(public_url)
    }
}
