//! Turns an upload form into stored objects and merged letter documents.
//!
//! Files are stored first. Every file that could not be named or stored is
//! skipped. The stored words are grouped by letter and each letter is merged
//! into its document independently: a document store failure drops that
//! letter from the result without affecting the others.

use crate::locks::LetterLocks;
use crate::metrics_defs::{FILES_SKIPPED, FILES_STORED, LETTERS_FAILED};
use crate::multipart::UploadItem;
use crate::naming::NamingPolicy;
use crate::object_store::AssetStore;
use letter_store::gateway::commit;
use letter_store::grouper::group_by_letter;
use letter_store::{
    MergeOutcome, PersistError, PersistenceGateway, UploadedWord, WordRecord, merge,
};
use shared::counter;
use std::sync::Arc;

pub struct UploadPipeline {
    assets: AssetStore,
    letters: Arc<dyn PersistenceGateway>,
    naming: Arc<dyn NamingPolicy>,
    locks: LetterLocks,
}

impl UploadPipeline {
    pub fn new(
        assets: AssetStore,
        letters: Arc<dyn PersistenceGateway>,
        naming: Arc<dyn NamingPolicy>,
    ) -> Self {
        UploadPipeline {
            assets,
            letters,
            naming,
            locks: LetterLocks::new(),
        }
    }

    /// Stores and records every item, returning the words that were persisted.
    pub async fn handle(&self, items: Vec<UploadItem>) -> Vec<UploadedWord> {
        let uploaded = self.store_files(items).await;
        self.record_words(uploaded).await
    }

    /// Writes each file to the object store, in arrival order.
    pub async fn store_files(&self, items: Vec<UploadItem>) -> Vec<UploadedWord> {
        let mut uploaded = Vec::with_capacity(items.len());

        for item in items {
            let Some(name) = self.naming.word_for(&item.filename) else {
                tracing::warn!(filename = %item.filename, "Skipping file without a usable name");
                counter!(FILES_SKIPPED).increment(1);
                continue;
            };

            let path = item.object_path();
            match self.assets.store(&path, item.content).await {
                Ok(url) => {
                    counter!(FILES_STORED).increment(1);
                    uploaded.push(UploadedWord::new(
                        item.letter,
                        WordRecord::new(name, url.to_string()),
                    ));
                }
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "Skipping file that could not be stored");
                    counter!(FILES_SKIPPED).increment(1);
                }
            }
        }

        uploaded
    }

    /// Merges the words into their letter documents. Letters whose document
    /// could not be read or written are left out of the result.
    pub async fn record_words(&self, uploaded: Vec<UploadedWord>) -> Vec<UploadedWord> {
        let mut recorded = Vec::with_capacity(uploaded.len());

        for (letter, words) in group_by_letter(uploaded) {
            match self.merge_letter(&letter, words.clone()).await {
                Ok(outcome) => {
                    tracing::info!(
                        letter = %letter,
                        decision = ?outcome.decision,
                        uploaded = words.len(),
                        total = outcome.aggregate.words.len(),
                        "Recorded words"
                    );
                    recorded.extend(
                        words
                            .into_iter()
                            .map(|word| UploadedWord::new(letter.clone(), word)),
                    );
                }
                Err(e) => {
                    tracing::error!(letter = %letter, error = %e, "Document store operation failed");
                    counter!(LETTERS_FAILED).increment(1);
                }
            }
        }

        recorded
    }

    async fn merge_letter(
        &self,
        letter: &str,
        words: Vec<WordRecord>,
    ) -> Result<MergeOutcome, PersistError> {
        let _guard = self.locks.lock(letter).await;

        let existing = self.letters.fetch_by_letter(letter).await?;
        let outcome = merge(existing, letter, words);
        commit(self.letters.as_ref(), &outcome).await?;
        Ok(outcome)
    }
}
