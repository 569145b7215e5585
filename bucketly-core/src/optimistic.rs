//! Optimistic local updates with a compensating rollback.
//!
//! The new value is shown immediately; if the remote write fails the previous
//! value is put back. The backend stays the source of truth, so a confirmed
//! change may still be replaced by whatever the server returns.

use std::future::Future;
use std::mem;

use tracing::debug;

/// A value shown to the user that may be ahead of the backend.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Optimistic<T> {
    value: T,
}

/// Token for an applied but unconfirmed change. Holds what to restore on failure.
#[derive(Debug)]
#[must_use = "a pending change must be confirmed or rolled back"]
pub struct PendingChange<T> {
    previous: T,
}

impl<T> PendingChange<T> {
    pub fn previous(&self) -> &T {
        &self.previous
    }
}

impl<T> Optimistic<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    /// Show `next` now and return the token that can undo it.
    pub fn apply(&mut self, next: T) -> PendingChange<T> {
        PendingChange {
            previous: mem::replace(&mut self.value, next),
        }
    }

    /// Keep the optimistic value.
    pub fn confirm(&mut self, change: PendingChange<T>) {
        drop(change);
    }

    /// Keep the change but adopt the value the backend reported.
    pub fn confirm_with(&mut self, change: PendingChange<T>, authoritative: T) {
        drop(change);
        self.value = authoritative;
    }

    /// Restore the value from before the change.
    pub fn rollback(&mut self, change: PendingChange<T>) {
        self.value = change.previous;
    }

    /// Apply `next`, run `remote`, and roll back if it fails.
    pub async fn run<F, Fut, R>(&mut self, next: T, remote: F) -> anyhow::Result<R>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<R>>,
    {
        let change = self.apply(next);
        match remote().await {
            Ok(result) => {
                self.confirm(change);
                Ok(result)
            }
            Err(err) => {
                debug!(?err, "remote write failed; rolling back optimistic change");
                self.rollback(change);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Optimistic;

    #[test]
    fn rollback_restores_previous_value() {
        let mut completed = Optimistic::new(false);
        let change = completed.apply(true);
        assert!(*completed.get());
        assert!(!*change.previous());

        completed.rollback(change);
        assert!(!*completed.get());
    }

    #[test]
    fn confirm_with_adopts_server_value() {
        let mut points = Optimistic::new(10);
        let change = points.apply(15);
        points.confirm_with(change, 14);
        assert_eq!(*points.get(), 14);
    }

    #[tokio::test]
    async fn run_keeps_value_on_success() {
        let mut completed = Optimistic::new(false);
        let echoed = completed.run(true, || async { Ok(7) }).await.unwrap();
        assert_eq!(echoed, 7);
        assert!(*completed.get());
    }

    #[tokio::test]
    async fn run_rolls_back_on_failure() {
        let mut title = Optimistic::new("Visit Kyoto".to_owned());
        let result: anyhow::Result<()> = title
            .run("Visit Osaka".to_owned(), || async {
                anyhow::bail!("network unreachable")
            })
            .await;

        assert!(result.is_err());
        assert_eq!(title.get(), "Visit Kyoto");
    }
}
