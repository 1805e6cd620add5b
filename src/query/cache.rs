use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

use crate::error::ApiError;

/// A single cached read with a freshness window.
///
/// * fresh: served from cache.
/// * stale: served from cache while one background refetch runs.
/// * empty or invalidated: the caller waits for a fetch. Concurrent callers
///   queue on the fetch lock and reuse the first caller's result.
///
/// Invalidation bumps a generation counter. A fetch that started under an
/// older generation still stores its data, but the slot stays invalidated
/// so the next read goes back to the backend.
pub struct Query<T> {
    name: String,
    stale_time: Duration,
    slot: Mutex<Slot<T>>,
    fetch_lock: Arc<AsyncMutex<()>>,
}

struct Slot<T> {
    data: Option<T>,
    fetched_at: Option<Instant>,
    invalidated: bool,
    generation: u64,
    last_used: Instant,
}

enum Freshness<T> {
    Fresh(T),
    Stale(T),
    Missing,
}

impl<T> Query<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, stale_time: Duration) -> Self {
        Self {
            name: name.into(),
            stale_time,
            slot: Mutex::new(Slot {
                data: None,
                fetched_at: None,
                invalidated: false,
                generation: 0,
                last_used: Instant::now(),
            }),
            fetch_lock: Arc::new(AsyncMutex::new(())),
        }
    }

    pub async fn get<F, Fut>(self: &Arc<Self>, fetcher: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        match self.lookup() {
            Freshness::Fresh(value) => {
                debug!(query = %self.name, "cache hit");
                return Ok(value);
            }
            Freshness::Stale(value) => {
                debug!(query = %self.name, "serving stale data, refetching in background");
                self.spawn_refresh(fetcher);
                return Ok(value);
            }
            Freshness::Missing => {}
        }

        let _guard = self.fetch_lock.lock().await;
        if let Freshness::Fresh(value) = self.lookup() {
            debug!(query = %self.name, "fetched by a concurrent caller");
            return Ok(value);
        }
        debug!(query = %self.name, "cache miss");
        self.run(fetcher).await
    }

    /// Marks the cached value unusable; the next read waits for a refetch.
    pub fn invalidate(&self) {
        let mut slot = self.lock_slot();
        slot.invalidated = true;
        slot.generation += 1;
        debug!(query = %self.name, generation = slot.generation, "invalidated");
    }

    pub fn is_invalidated(&self) -> bool {
        self.lock_slot().invalidated
    }

    /// Cached value regardless of freshness, without touching the backend.
    pub fn peek(&self) -> Option<T> {
        self.lock_slot().data.clone()
    }

    pub fn idle_for(&self) -> Duration {
        self.lock_slot().last_used.elapsed()
    }

    fn lookup(&self) -> Freshness<T> {
        let mut slot = self.lock_slot();
        slot.last_used = Instant::now();
        if slot.invalidated {
            return Freshness::Missing;
        }
        match (&slot.data, slot.fetched_at) {
            (Some(data), Some(at)) if at.elapsed() < self.stale_time => Freshness::Fresh(data.clone()),
            (Some(data), _) => Freshness::Stale(data.clone()),
            (None, _) => Freshness::Missing,
        }
    }

    fn spawn_refresh<F, Fut>(self: &Arc<Self>, fetcher: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let Ok(guard) = Arc::clone(&self.fetch_lock).try_lock_owned() else {
            debug!(query = %self.name, "refetch already running");
            return;
        };
        let query = Arc::clone(self);
        tokio::spawn(async move {
            let _guard = guard;
            if let Err(e) = query.run(fetcher).await {
                warn!(query = %query.name, error = %e, "background refetch failed");
            }
        });
    }

    async fn run<F, Fut>(&self, fetcher: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let generation = self.lock_slot().generation;
        let value = fetcher().await?;

        let mut slot = self.lock_slot();
        slot.data = Some(value.clone());
        slot.fetched_at = Some(Instant::now());
        if slot.generation == generation {
            slot.invalidated = false;
        } else {
            debug!(query = %self.name, "invalidated during fetch, keeping stale mark");
        }
        Ok(value)
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
