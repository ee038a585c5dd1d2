//! One-way readiness signalling
//!
//! A [`ReadyNotifier`] moves a collection out of the pending state exactly
//! once: either to ready, or to abandoned when the work that would have made
//! it ready is shut down first. Any number of [`ReadySignal`] holders can
//! observe or await the transition. Neither outcome is ever reset.

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadyState {
    Pending,
    Ready,
    Abandoned,
}

/// Creates a connected notifier/signal pair in the pending state.
pub fn ready_pair() -> (ReadyNotifier, ReadySignal) {
    let (tx, rx) = watch::channel(ReadyState::Pending);
    (ReadyNotifier { tx }, ReadySignal { rx })
}

/// Sending half, owned by whatever performs the initial population
#[derive(Debug)]
pub struct ReadyNotifier {
    tx: watch::Sender<ReadyState>,
}

impl ReadyNotifier {
    /// Marks the collection ready. No-op once resolved or abandoned.
    pub fn notify(&self) {
        self.resolve(ReadyState::Ready);
    }

    /// Gives up on readiness: waiters are released with `false`.
    ///
    /// No-op once the collection is ready.
    pub fn abandon(&self) {
        self.resolve(ReadyState::Abandoned);
    }

    fn resolve(&self, outcome: ReadyState) {
        self.tx.send_if_modified(|state| {
            if *state != ReadyState::Pending {
                return false;
            }
            *state = outcome;
            true
        });
    }

    /// Whether [`ReadyNotifier::notify`] took effect
    pub fn is_ready(&self) -> bool {
        *self.tx.borrow() == ReadyState::Ready
    }

    /// A new signal observing this notifier
    pub fn subscribe(&self) -> ReadySignal {
        ReadySignal { rx: self.tx.subscribe() }
    }
}

/// Receiving half, cheap to clone and share across tasks
#[derive(Debug, Clone)]
pub struct ReadySignal {
    rx: watch::Receiver<ReadyState>,
}

impl ReadySignal {
    /// A signal that is already resolved.
    pub fn resolved() -> Self {
        let (_tx, rx) = watch::channel(ReadyState::Ready);
        Self { rx }
    }

    /// Whether the collection is ready right now
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow() == ReadyState::Ready
    }

    /// Waits until the signal leaves the pending state.
    ///
    /// Returns `false` if readiness was abandoned or the notifier was dropped
    /// while still pending.
    pub async fn wait(&self) -> bool {
        let mut rx = self.rx.clone();
        let outcome = rx.wait_for(|state| *state != ReadyState::Pending).await.map(|state| *state);
        matches!(outcome, Ok(ReadyState::Ready))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_resolved_signal_does_not_wait() {
        let signal = ReadySignal::resolved();
        assert!(signal.is_ready());
        let ready = tokio::time::timeout(Duration::from_millis(50), signal.wait())
            .await
            .expect("resolved signal must not block");
        assert!(ready);
    }

    #[tokio::test]
    async fn test_notify_releases_all_waiters() {
        let (notifier, signal) = ready_pair();
        assert!(!signal.is_ready());

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let signal = signal.clone();
                tokio::spawn(async move { signal.wait().await })
            })
            .collect();

        notifier.notify();
        for waiter in waiters {
            assert!(waiter.await.unwrap());
        }
        assert!(notifier.is_ready());
        assert!(notifier.subscribe().is_ready());
    }

    #[tokio::test]
    async fn test_notify_is_idempotent() {
        let (notifier, signal) = ready_pair();
        notifier.notify();
        notifier.notify();
        assert!(signal.is_ready());
    }

    #[tokio::test]
    async fn test_dropped_notifier_reports_not_ready() {
        let (notifier, signal) = ready_pair();
        drop(notifier);
        assert!(!signal.wait().await);
        assert!(!signal.is_ready());
    }

    #[tokio::test]
    async fn test_abandon_releases_waiters_with_false() {
        let (notifier, signal) = ready_pair();
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.wait().await })
        };

        notifier.abandon();
        let ready = tokio::time::timeout(Duration::from_millis(200), waiter)
            .await
            .expect("abandon must release waiters")
            .unwrap();
        assert!(!ready);
        assert!(!signal.wait().await);

        // Abandoned is final
        notifier.notify();
        assert!(!notifier.is_ready());
    }

    #[tokio::test]
    async fn test_abandon_after_ready_is_ignored() {
        let (notifier, signal) = ready_pair();
        notifier.notify();
        notifier.abandon();
        assert!(signal.is_ready());
        assert!(signal.wait().await);
    }
}
