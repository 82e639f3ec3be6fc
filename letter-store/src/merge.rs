//! Upsert logic for per-letter word collections.
//!
//! A batch of incoming words is folded into the existing document for a letter:
//! - Words with a name already present replace that entry in place
//! - Words with a new name are appended in arrival order
//! - Existing words not named in the batch are kept untouched
//!
//! When no document exists yet the batch becomes the new document. Duplicate
//! names inside one batch collapse to a single entry holding the last value.

use crate::types::{LetterAggregate, WordRecord};
use std::collections::HashMap;

/// How the merged aggregate has to be written back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    /// No document existed for the letter.
    Insert,
    /// The document existed and its words must be replaced.
    Update,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOutcome {
    pub aggregate: LetterAggregate,
    pub decision: Decision,
}

/// Merges `incoming` into `existing`.
///
/// An update is returned even when no word changed value, so re-uploading
/// identical content still issues a write.
pub fn merge(
    existing: Option<LetterAggregate>,
    letter: &str,
    incoming: Vec<WordRecord>,
) -> MergeOutcome {
    match existing {
        None => MergeOutcome {
            aggregate: LetterAggregate::new(letter, upsert(Vec::new(), incoming)),
            decision: Decision::Insert,
        },
        Some(existing) => MergeOutcome {
            aggregate: LetterAggregate::new(letter, upsert(existing.words, incoming)),
            decision: Decision::Update,
        },
    }
}

// Only the first word carrying a name is addressable; later stored duplicates
// are left as they are.
fn upsert(mut words: Vec<WordRecord>, incoming: Vec<WordRecord>) -> Vec<WordRecord> {
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(words.len() + incoming.len());
    for (idx, word) in words.iter().enumerate() {
        slots.entry(word.name.clone()).or_insert(idx);
    }

    for word in incoming {
        match slots.get(&word.name) {
            Some(&idx) => words[idx] = word,
            None => {
                slots.insert(word.name.clone(), words.len());
                words.push(word);
            }
        }
    }

    words
}
