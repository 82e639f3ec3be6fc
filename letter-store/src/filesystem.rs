// Stores each letter document as a JSON file under a base directory.
//
// File names are the hex encoding of the letter's UTF-8 bytes, so any letter
// string maps to a safe, unique file name ("A" -> "41.json").
use crate::gateway::{PersistError, PersistenceGateway};
use crate::types::{LetterAggregate, WordRecord};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

const EXTENSION: &str = "json";

pub struct FilesystemLetterStore {
    base_dir: PathBuf,
}

impl FilesystemLetterStore {
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        FilesystemLetterStore {
            base_dir: base_dir.into(),
        }
    }

    fn document_path(&self, letter: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}.{EXTENSION}", encode_letter(letter)))
    }

    async fn read_document(&self, path: &Path) -> Result<Option<LetterAggregate>, PersistError> {
        match tokio::fs::read(path).await {
            Ok(data) => Ok(Some(serde_json::from_slice(&data)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // Write to a sibling temp file and rename it over the target, so readers
    // never observe a partially written document.
    async fn write_document(
        &self,
        path: &Path,
        aggregate: &LetterAggregate,
    ) -> Result<(), PersistError> {
        tokio::fs::create_dir_all(&self.base_dir).await?;

        let data = serde_json::to_vec(aggregate)?;
        let tmp_path = path.with_extension(format!("{}.tmp", std::process::id()));
        tokio::fs::write(&tmp_path, &data).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        tracing::debug!(
            letter = %aggregate.letter,
            words = aggregate.words.len(),
            bytes = data.len(),
            path = %path.display(),
            "Stored letter document"
        );
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for FilesystemLetterStore {
    async fn fetch_by_letter(&self, letter: &str) -> Result<Option<LetterAggregate>, PersistError> {
        self.read_document(&self.document_path(letter)).await
    }

    async fn insert(&self, aggregate: &LetterAggregate) -> Result<(), PersistError> {
        let path = self.document_path(&aggregate.letter);
        if tokio::fs::try_exists(&path).await? {
            return Err(PersistError::AlreadyExists(aggregate.letter.clone()));
        }
        self.write_document(&path, aggregate).await
    }

    async fn replace_words(&self, letter: &str, words: &[WordRecord]) -> Result<(), PersistError> {
        let path = self.document_path(letter);
        let mut document = self
            .read_document(&path)
            .await?
            .ok_or_else(|| PersistError::NotFound(letter.to_string()))?;
        document.words = words.to_vec();
        self.write_document(&path, &document).await
    }

    async fn count(&self) -> Result<usize, PersistError> {
        let mut entries = match tokio::fs::read_dir(&self.base_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut count = 0;
        while let Some(entry) = entries.next_entry().await? {
            if entry.path().extension().is_some_and(|ext| ext == EXTENSION) {
                count += 1;
            }
        }
        Ok(count)
    }
}

fn encode_letter(letter: &str) -> String {
    letter.bytes().map(|b| format!("{b:02x}")).collect()
}
