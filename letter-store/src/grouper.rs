use crate::types::{UploadedWord, WordRecord};
use indexmap::IndexMap;

/// Per-letter batches in the order each letter was first seen.
pub type LetterBatches = IndexMap<String, Vec<WordRecord>>;

/// Groups uploaded words by letter, keeping arrival order within each letter.
///
/// Duplicates are kept here; the merge collapses them.
pub fn group_by_letter<I>(uploads: I) -> LetterBatches
where
    I: IntoIterator<Item = UploadedWord>,
{
    let mut batches = LetterBatches::new();
    for upload in uploads {
        batches.entry(upload.letter).or_default().push(upload.word);
    }
    batches
}
