//! The persistence gateway owns the durable copy of every letter document.
//! Callers fetch, merge in memory and write back through this trait.
use crate::merge::{Decision, MergeOutcome};
use crate::metrics_defs::{LETTER_INSERTED, LETTER_UPDATED};
use crate::types::{LetterAggregate, WordRecord};
use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use shared::counter;
use std::io;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("a document for letter {0:?} already exists")]
    AlreadyExists(String),

    #[error("no document found for letter {0:?}")]
    NotFound(String),

    #[error("document store did not respond within {0:?}")]
    Timeout(Duration),
}

// Fetch and write are separate calls. Two writers merging the same letter
// concurrently can lose an update; closing that needs a compare-and-swap on
// the document inside the implementation.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn fetch_by_letter(&self, letter: &str) -> Result<Option<LetterAggregate>, PersistError>;

    async fn insert(&self, aggregate: &LetterAggregate) -> Result<(), PersistError>;

    async fn replace_words(&self, letter: &str, words: &[WordRecord]) -> Result<(), PersistError>;

    /// Number of letter documents currently stored.
    async fn count(&self) -> Result<usize, PersistError>;
}

/// Writes a merge outcome back using the operation its decision asks for.
pub async fn commit(
    gateway: &dyn PersistenceGateway,
    outcome: &MergeOutcome,
) -> Result<(), PersistError> {
    let aggregate = &outcome.aggregate;
    match outcome.decision {
        Decision::Insert => {
            gateway.insert(aggregate).await?;
            counter!(LETTER_INSERTED).increment(1);
        }
        Decision::Update => {
            gateway
                .replace_words(&aggregate.letter, &aggregate.words)
                .await?;
            counter!(LETTER_UPDATED).increment(1);
        }
    }
    Ok(())
}

/// In-process store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryLetterStore {
    documents: RwLock<IndexMap<String, LetterAggregate>>,
}

impl MemoryLetterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersistenceGateway for MemoryLetterStore {
    async fn fetch_by_letter(&self, letter: &str) -> Result<Option<LetterAggregate>, PersistError> {
        Ok(self.documents.read().get(letter).cloned())
    }

    async fn insert(&self, aggregate: &LetterAggregate) -> Result<(), PersistError> {
        let mut documents = self.documents.write();
        if documents.contains_key(&aggregate.letter) {
            return Err(PersistError::AlreadyExists(aggregate.letter.clone()));
        }
        documents.insert(aggregate.letter.clone(), aggregate.clone());
        Ok(())
    }

    async fn replace_words(&self, letter: &str, words: &[WordRecord]) -> Result<(), PersistError> {
        let mut documents = self.documents.write();
        let document = documents
            .get_mut(letter)
            .ok_or_else(|| PersistError::NotFound(letter.to_string()))?;
        document.words = words.to_vec();
        Ok(())
    }

    async fn count(&self) -> Result<usize, PersistError> {
        Ok(self.documents.read().len())
    }
}

/// Bounds every call to the wrapped store by a timeout.
pub struct WithTimeout<G> {
    inner: G,
    timeout: Duration,
}

impl<G> WithTimeout<G> {
    pub fn new(inner: G, timeout: Duration) -> Self {
        WithTimeout { inner, timeout }
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, PersistError>
    where
        F: Future<Output = Result<T, PersistError>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| PersistError::Timeout(self.timeout))?
    }
}

#[async_trait]
impl<G: PersistenceGateway> PersistenceGateway for WithTimeout<G> {
    async fn fetch_by_letter(&self, letter: &str) -> Result<Option<LetterAggregate>, PersistError> {
        self.bounded(self.inner.fetch_by_letter(letter)).await
    }

    async fn insert(&self, aggregate: &LetterAggregate) -> Result<(), PersistError> {
        self.bounded(self.inner.insert(aggregate)).await
    }

    async fn replace_words(&self, letter: &str, words: &[WordRecord]) -> Result<(), PersistError> {
        self.bounded(self.inner.replace_words(letter, words)).await
    }

    async fn count(&self) -> Result<usize, PersistError> {
        self.bounded(self.inner.count()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge;

    struct StalledStore;

    #[async_trait]
    impl PersistenceGateway for StalledStore {
        async fn fetch_by_letter(
            &self,
            _letter: &str,
        ) -> Result<Option<LetterAggregate>, PersistError> {
            std::future::pending().await
        }

        async fn insert(&self, _aggregate: &LetterAggregate) -> Result<(), PersistError> {
            std::future::pending().await
        }

        async fn replace_words(
            &self,
            _letter: &str,
            _words: &[WordRecord],
        ) -> Result<(), PersistError> {
            std::future::pending().await
        }

        async fn count(&self) -> Result<usize, PersistError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_memory_insert_then_fetch() {
        let store = MemoryLetterStore::new();
        let aggregate = LetterAggregate::new("A", vec![WordRecord::new("Apple", "url1")]);

        assert_eq!(store.fetch_by_letter("A").await.unwrap(), None);
        store.insert(&aggregate).await.unwrap();
        assert_eq!(store.fetch_by_letter("A").await.unwrap(), Some(aggregate));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_memory_insert_twice_fails() {
        let store = MemoryLetterStore::new();
        let aggregate = LetterAggregate::new("A", Vec::new());

        store.insert(&aggregate).await.unwrap();
        assert!(matches!(
            store.insert(&aggregate).await,
            Err(PersistError::AlreadyExists(letter)) if letter == "A"
        ));
    }

    #[tokio::test]
    async fn test_memory_replace_missing_fails() {
        let store = MemoryLetterStore::new();
        assert!(matches!(
            store.replace_words("Z", &[]).await,
            Err(PersistError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_commit_follows_decision() {
        let store = MemoryLetterStore::new();

        let first = merge(None, "A", vec![WordRecord::new("Apple", "url1")]);
        commit(&store, &first).await.unwrap();

        let existing = store.fetch_by_letter("A").await.unwrap();
        let second = merge(
            existing,
            "A",
            vec![
                WordRecord::new("Apple", "url2"),
                WordRecord::new("Ant", "url3"),
            ],
        );
        assert_eq!(second.decision, Decision::Update);
        commit(&store, &second).await.unwrap();

        assert_eq!(
            store.fetch_by_letter("A").await.unwrap(),
            Some(LetterAggregate::new(
                "A",
                vec![
                    WordRecord::new("Apple", "url2"),
                    WordRecord::new("Ant", "url3"),
                ]
            ))
        );
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let store = WithTimeout::new(StalledStore, Duration::from_millis(20));

        assert!(matches!(
            store.fetch_by_letter("A").await,
            Err(PersistError::Timeout(_))
        ));
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
