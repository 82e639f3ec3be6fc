/// Turns an uploaded filename into the word it depicts.
pub trait NamingPolicy: Send + Sync {
    /// Returns `None` when no usable word can be derived.
    fn word_for(&self, filename: &str) -> Option<String>;
}

/// Title-cases the lowercased filename stem: `"APPLE.png"` becomes `"Apple"`.
///
/// Only the last extension is removed and any directory part is ignored.
pub struct TitleCase;

impl NamingPolicy for TitleCase {
    fn word_for(&self, filename: &str) -> Option<String> {
        let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
        let stem = match base.rfind('.') {
            Some(dot) => &base[..dot],
            None => base,
        };

        let lower = stem.to_lowercase();
        let mut chars = lower.chars();
        let first = chars.next()?;
        Some(first.to_uppercase().chain(chars).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        let policy = TitleCase;
        assert_eq!(policy.word_for("apple.png").as_deref(), Some("Apple"));
        assert_eq!(policy.word_for("BANANA.JPG").as_deref(), Some("Banana"));
        assert_eq!(policy.word_for("ice CREAM.png").as_deref(), Some("Ice cream"));
        assert_eq!(policy.word_for("kiwi").as_deref(), Some("Kiwi"));
        assert_eq!(policy.word_for("über.webp").as_deref(), Some("Über"));
    }

    #[test]
    fn test_only_last_extension_removed() {
        assert_eq!(
            TitleCase.word_for("archive.tar.gz").as_deref(),
            Some("Archive.tar")
        );
    }

    #[test]
    fn test_directory_part_ignored() {
        assert_eq!(TitleCase.word_for("A/ant.png").as_deref(), Some("Ant"));
        assert_eq!(TitleCase.word_for("B\\bee.png").as_deref(), Some("Bee"));
    }

    #[test]
    fn test_empty_stem() {
        assert_eq!(TitleCase.word_for(""), None);
        assert_eq!(TitleCase.word_for(".png"), None);
    }
}
