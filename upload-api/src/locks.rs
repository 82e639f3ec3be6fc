// Serializes fetch-merge-write per letter inside this process. Writers in
// other processes are not covered; the document store would need a
// compare-and-swap for that.
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

type LetterLock = Arc<tokio::sync::Mutex<()>>;
type LockTable = Arc<Mutex<HashMap<String, LetterLock>>>;

#[derive(Clone, Default)]
pub struct LetterLocks {
    // Only letters that are held or waited on have an entry.
    locks: LockTable,
}

impl LetterLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other task holds `letter`, then holds it until the guard drops.
    pub async fn lock(&self, letter: &str) -> LetterGuard {
        let lock = {
            let mut locks = self.locks.lock();
            locks.entry(letter.to_string()).or_default().clone()
        };
        LetterGuard {
            letter: letter.to_string(),
            guard: Some(lock.lock_owned().await),
            locks: self.locks.clone(),
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().len()
    }
}

/// Releases the letter on drop and forgets it once nobody else is waiting.
pub struct LetterGuard {
    letter: String,
    guard: Option<OwnedMutexGuard<()>>,
    locks: LockTable,
}

impl Drop for LetterGuard {
    fn drop(&mut self) {
        // Waiters clone the entry under the table lock, so a count of one
        // while holding it means the table owns the last reference.
        let mut locks = self.locks.lock();
        self.guard.take();
        if let Some(lock) = locks.get(&self.letter)
            && Arc::strong_count(lock) == 1
        {
            locks.remove(&self.letter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_letter_is_exclusive() {
        let locks = LetterLocks::new();
        let guard = locks.lock("A").await;

        let contended = tokio::time::timeout(Duration::from_millis(50), locks.lock("A")).await;
        assert!(contended.is_err());

        drop(guard);
        let reacquired = tokio::time::timeout(Duration::from_millis(50), locks.lock("A")).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn test_letters_are_independent() {
        let locks = LetterLocks::new();
        let _a = locks.lock("A").await;

        let b = tokio::time::timeout(Duration::from_millis(50), locks.lock("B")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_released_letters_are_forgotten() {
        let locks = LetterLocks::new();
        for letter in ["A", "B", "zzz", "not a letter"] {
            let _guard = locks.lock(letter).await;
            assert_eq!(locks.tracked(), 1);
        }

        assert_eq!(locks.tracked(), 0);
    }

    #[tokio::test]
    async fn test_entry_kept_while_waiter_queued() {
        let locks = LetterLocks::new();
        let first = locks.lock("A").await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock("A").await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(first);
        assert_eq!(locks.tracked(), 1);

        waiter.await.unwrap();
        assert_eq!(locks.tracked(), 0);
    }
}
