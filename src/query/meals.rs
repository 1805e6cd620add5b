use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::api::MealApi;
use crate::config::QueryConfig;
use crate::error::ApiError;
use crate::meals::model::Meal;
use crate::query::Query;

/// Cached reads of the meal collection and of single meals, keyed by id.
pub struct MealQueries {
    api: Arc<dyn MealApi>,
    stale_time: Duration,
    gc_time: Duration,
    list: Arc<Query<Vec<Meal>>>,
    by_id: Mutex<HashMap<String, Arc<Query<Meal>>>>,
}

impl MealQueries {
    pub fn new(api: Arc<dyn MealApi>, config: &QueryConfig) -> Self {
        Self {
            api,
            stale_time: config.stale_time(),
            gc_time: config.gc_time(),
            list: Arc::new(Query::new("meals", config.stale_time())),
            by_id: Mutex::new(HashMap::new()),
        }
    }

    pub async fn meals(&self) -> Result<Vec<Meal>, ApiError> {
        let api = Arc::clone(&self.api);
        self.list
            .get(move || async move { api.list_meals().await })
            .await
    }

    pub async fn meal(&self, id: &str) -> Result<Meal, ApiError> {
        let query = self.entry(id);
        let api = Arc::clone(&self.api);
        let id = id.to_string();
        query.get(move || async move { api.get_meal(&id).await }).await
    }

    pub fn meals_invalidated(&self) -> bool {
        self.list.is_invalidated()
    }

    pub fn invalidate_meals(&self) {
        self.list.invalidate();
    }

    pub fn invalidate_meal(&self, id: &str) {
        if let Some(query) = self.lock_by_id().get(id) {
            query.invalidate();
        }
    }

    pub fn forget_meal(&self, id: &str) {
        self.lock_by_id().remove(id);
    }

    fn entry(&self, id: &str) -> Arc<Query<Meal>> {
        let mut by_id = self.lock_by_id();

        let before = by_id.len();
        let gc_time = self.gc_time;
        by_id.retain(|_, query| Arc::strong_count(query) > 1 || query.idle_for() < gc_time);
        if by_id.len() < before {
            debug!(evicted = before - by_id.len(), "dropped idle meal queries");
        }

        let stale_time = self.stale_time;
        Arc::clone(
            by_id
                .entry(id.to_string())
                .or_insert_with(|| Arc::new(Query::new(format!("meal:{id}"), stale_time))),
        )
    }

    fn lock_by_id(&self) -> MutexGuard<'_, HashMap<String, Arc<Query<Meal>>>> {
        self.by_id.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
