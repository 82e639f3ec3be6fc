use serde::{Deserialize, Serialize};

/// A single word and the reference to its stored image.
///
/// Serialized as `{"word": ..., "imageUrl": ...}` to stay compatible with
/// documents written by earlier versions of the service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    #[serde(rename = "word")]
    pub name: String,
    #[serde(rename = "imageUrl")]
    pub image_ref: String,
}

impl WordRecord {
    pub fn new<N, I>(name: N, image_ref: I) -> Self
    where
        N: Into<String>,
        I: Into<String>,
    {
        WordRecord {
            name: name.into(),
            image_ref: image_ref.into(),
        }
    }
}

/// The document stored per letter. Word names are unique within `words`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LetterAggregate {
    pub letter: String,
    pub words: Vec<WordRecord>,
}

impl LetterAggregate {
    pub fn new<L: Into<String>>(letter: L, words: Vec<WordRecord>) -> Self {
        LetterAggregate {
            letter: letter.into(),
            words,
        }
    }
}

/// A word whose image has been stored, tagged with the letter it was uploaded under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UploadedWord {
    pub letter: String,
    #[serde(flatten)]
    pub word: WordRecord,
}

impl UploadedWord {
    pub fn new<L: Into<String>>(letter: L, word: WordRecord) -> Self {
        UploadedWord {
            letter: letter.into(),
            word,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_field_names() {
        let aggregate = LetterAggregate::new(
            "A",
            vec![WordRecord::new("Apple", "https://img.example/assets/A/apple.png")],
        );

        let json = serde_json::to_value(&aggregate).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "letter": "A",
                "words": [{"word": "Apple", "imageUrl": "https://img.example/assets/A/apple.png"}]
            })
        );

        let parsed: LetterAggregate = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, aggregate);
    }

    #[test]
    fn test_uploaded_word_is_flat() {
        let uploaded = UploadedWord::new("B", WordRecord::new("Ball", "url1"));
        let json = serde_json::to_value(&uploaded).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"letter": "B", "word": "Ball", "imageUrl": "url1"})
        );
    }
}
