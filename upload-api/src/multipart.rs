use crate::errors::UploadApiError;
use axum::extract::Multipart;
use bytes::Bytes;

const FILES_FIELD: &str = "files";
const LETTERS_FIELD: &str = "letters";
const PATHS_FIELD: &str = "paths";

/// One uploaded file together with the form values sent for it.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadItem {
    pub content: Bytes,
    pub letter: String,
    pub filename: String,
    pub path: Option<String>,
}

impl UploadItem {
    /// The path the object is stored under, relative to the key prefix.
    pub fn object_path(&self) -> String {
        match &self.path {
            Some(path) => path.clone(),
            None => format!("{}/{}", self.letter, self.filename),
        }
    }
}

/// Reads the repeated `files`, `letters` and `paths` fields of an upload form.
///
/// The i-th letter and the i-th path belong to the i-th file. Paths are
/// optional; letters are required for every file. Unknown fields are ignored.
pub async fn read_upload_form(
    mut multipart: Multipart,
) -> Result<Vec<UploadItem>, UploadApiError> {
    let mut files = Vec::new();
    let mut letters = Vec::new();
    let mut paths = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILES_FIELD) => {
                let filename = field.file_name().unwrap_or_default().to_string();
                files.push((filename, field.bytes().await?));
            }
            Some(LETTERS_FIELD) => letters.push(field.text().await?),
            Some(PATHS_FIELD) => paths.push(field.text().await?),
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown form field");
            }
        }
    }

    if letters.len() < files.len() {
        return Err(UploadApiError::MissingLetters {
            files: files.len(),
            letters: letters.len(),
        });
    }

    let mut paths = paths.into_iter();
    Ok(files
        .into_iter()
        .zip(letters)
        .map(|((filename, content), letter)| UploadItem {
            content,
            letter,
            filename,
            path: paths.next(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_path() {
        let mut item = UploadItem {
            content: Bytes::new(),
            letter: "A".into(),
            filename: "apple.png".into(),
            path: None,
        };
        assert_eq!(item.object_path(), "A/apple.png");

        item.path = Some("animals/A/apple.png".into());
        assert_eq!(item.object_path(), "animals/A/apple.png");
    }
}
