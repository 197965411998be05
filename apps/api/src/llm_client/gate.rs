//! Process-wide cooldown gate for outbound generation calls.
//!
//! At most one gated call is in flight at a time. After the call finishes the
//! holder keeps the gate for a fixed cooldown before the next caller may start,
//! which keeps traffic under the provider's requests-per-minute quota.
//! Waiters are served in the order `tokio::sync::Mutex` queues them (FIFO).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinError;
use tracing::debug;

pub struct CooldownGate {
    lock: Arc<Mutex<()>>,
    cooldown: Duration,
}

impl CooldownGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            lock: Arc::new(Mutex::new(())),
            cooldown,
        }
    }

    /// Runs `call` while holding the gate, then sleeps out the cooldown before
    /// releasing. The cooldown applies whether the call succeeded or failed.
    ///
    /// Once the gate is acquired, the call and the cooldown run on their own
    /// task: dropping the caller neither cancels the call nor releases the
    /// gate early. `Err` only if that task panicked or the runtime shut down.
    pub async fn run<F, T>(&self, call: F) -> Result<T, JoinError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let guard = self.lock.clone().lock_owned().await;
        let cooldown = self.cooldown;
        debug!("Generation gate acquired");

        tokio::spawn(async move {
            let output = call.await;
            tokio::time::sleep(cooldown).await;
            drop(guard);
            debug!("Generation gate released after {}ms cooldown", cooldown.as_millis());
            output
        })
        .await
    }
}
