//! At most one in-flight computation per key.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};

type Flight<T> = Shared<BoxFuture<'static, Option<T>>>;
type FlightMap<T> = Arc<Mutex<HashMap<String, Flight<T>>>>;

/// Coalesces concurrent calls for the same key onto one spawned task.
///
/// The first caller for a key spawns the work; callers arriving while it runs
/// await the same result. The task clears its own entry when it ends, so a
/// later call starts fresh even if every caller stopped waiting.
pub struct SingleFlight<T: Clone> {
    inflight: FlightMap<T>,
}

/// Removes a key from the flight map when the owning task ends, including by
/// panic or abort.
struct Landing<T: Clone> {
    inflight: FlightMap<T>,
    key: String,
}

impl<T: Clone> Drop for Landing<T> {
    fn drop(&mut self) {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

impl<T: Clone + Send + Sync + 'static> SingleFlight<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inflight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Runs `work` for `key` unless a run for `key` is already in flight, in
    /// which case that run's result is returned instead.
    ///
    /// The work runs on its own task and finishes even if this call is
    /// dropped. Returns `None` only if that task panicked or was aborted.
    pub async fn run<F, Fut>(&self, key: &str, work: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let flight = {
            let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(existing) = inflight.get(key) {
                tracing::debug!(key, "joining in-flight search");
                existing.clone()
            } else {
                let work = work();
                let landing = Landing {
                    inflight: Arc::clone(&self.inflight),
                    key: key.to_owned(),
                };
                // The map lock is held until the entry is inserted, so the
                // task cannot clear it first.
                let handle = tokio::spawn(async move {
                    let _landing = landing;
                    work.await
                });
                let flight = async move {
                    match handle.await {
                        Ok(output) => Some(output),
                        Err(e) => {
                            tracing::error!(error = %e, "in-flight search task failed");
                            None
                        }
                    }
                }
                .boxed()
                .shared();
                inflight.insert(key.to_owned(), flight.clone());
                flight
            }
        };

        flight.await
    }

    /// Number of keys with work in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for SingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}
