//! Per-session serialization of message processing.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Map size above which idle session locks are dropped.
const PRUNE_THRESHOLD: usize = 1024;

/// Keyed async mutex: one message per session at a time, sessions
/// independent of each other.
#[derive(Debug, Default)]
pub struct SessionLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of a session. Released when the guard drops.
    pub async fn acquire(&self, session_key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            if locks.len() > PRUNE_THRESHOLD {
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            Arc::clone(locks.entry(session_key.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of sessions currently tracked.
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_session_waits() {
        let locks = Arc::new(SessionLocks::new());
        let guard = locks.acquire("+1").await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire("+1").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_other_sessions_proceed() {
        let locks = SessionLocks::new();
        let _first = locks.acquire("+1").await;

        tokio::time::timeout(Duration::from_millis(100), locks.acquire("+2"))
            .await
            .unwrap();
        assert_eq!(locks.len().await, 2);
    }

    #[tokio::test]
    async fn test_idle_locks_are_pruned() {
        let locks = SessionLocks::new();
        for i in 0..=PRUNE_THRESHOLD {
            drop(locks.acquire(&format!("+{}", i)).await);
        }
        let _held = locks.acquire("held").await;
        assert_eq!(locks.len().await, 1);
    }
}
