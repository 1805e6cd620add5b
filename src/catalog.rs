//! Page-level workflow tying the query cache, the mutation trackers and the
//! UI store together. Writes never patch the cache: a successful write
//! invalidates and the next read refetches.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{error, info, instrument};

use crate::api::MealApi;
use crate::config::AppConfig;
use crate::error::CatalogError;
use crate::meals::filters::{apply_all_filters, paginate, Page};
use crate::meals::model::{CreateMealData, Meal, MealDraft, UpdateMealData};
use crate::query::{MealQueries, MutationKind, MutationStatus, MutationTracker};
use crate::store::{Action, ModalKind, SearchFilterState, UiStore};

pub struct Catalog {
    api: Arc<dyn MealApi>,
    queries: MealQueries,
    create: MutationTracker,
    update: MutationTracker,
    delete: MutationTracker,
    store: Mutex<UiStore>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationStatuses {
    pub create: MutationStatus,
    pub update: MutationStatus,
    pub delete: MutationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiSnapshot {
    pub modal: ModalKind,
    pub is_add_modal_open: bool,
    pub is_edit_modal_open: bool,
    pub is_delete_modal_open: bool,
    pub selected_meal: Option<Meal>,
    pub filters: SearchFilterState,
    pub visible_count: usize,
    pub mutations: MutationStatuses,
}

impl Catalog {
    pub fn new(api: Arc<dyn MealApi>, config: &AppConfig) -> Self {
        Self {
            queries: MealQueries::new(Arc::clone(&api), &config.query),
            api,
            create: MutationTracker::new(MutationKind::Create),
            update: MutationTracker::new(MutationKind::Update),
            delete: MutationTracker::new(MutationKind::Delete),
            store: Mutex::new(UiStore::new(config.page_size)),
        }
    }

    pub fn queries(&self) -> &MealQueries {
        &self.queries
    }

    pub async fn meals(&self) -> Result<Vec<Meal>, CatalogError> {
        Ok(self.queries.meals().await?)
    }

    pub async fn meal(&self, id: &str) -> Result<Meal, CatalogError> {
        Ok(self.queries.meal(id).await?)
    }

    /// The list as the grid shows it: store filters applied, then sliced.
    pub async fn visible_meals(&self) -> Result<Page, CatalogError> {
        let meals = self.meals().await?;
        let (filters, visible) = {
            let store = self.lock_store();
            (store.filters().clone(), store.visible_count())
        };
        let filtered = apply_all_filters(
            meals,
            &filters.search_query,
            filters.selected_status,
            filters.min_rating,
        );
        Ok(paginate(filtered, visible))
    }

    pub fn dispatch(&self, action: Action) {
        self.lock_store().dispatch(action);
    }

    pub fn open_add(&self) {
        self.dispatch(Action::OpenAdd);
    }

    pub async fn open_edit(&self, id: &str) -> Result<Meal, CatalogError> {
        let meal = self.meal(id).await?;
        self.dispatch(Action::OpenEdit(meal.clone()));
        Ok(meal)
    }

    pub async fn open_delete(&self, id: &str) -> Result<Meal, CatalogError> {
        let meal = self.meal(id).await?;
        self.dispatch(Action::OpenDelete(meal.clone()));
        Ok(meal)
    }

    pub fn close_modals(&self) {
        self.dispatch(Action::CloseAll);
    }

    pub fn snapshot(&self) -> UiSnapshot {
        let store = self.lock_store();
        let modal = store.modal();
        UiSnapshot {
            modal: modal.kind(),
            is_add_modal_open: modal.is_add_open(),
            is_edit_modal_open: modal.is_edit_open(),
            is_delete_modal_open: modal.is_delete_open(),
            selected_meal: modal.selected_meal().cloned(),
            filters: store.filters().clone(),
            visible_count: store.visible_count(),
            mutations: MutationStatuses {
                create: self.create.status(),
                update: self.update.status(),
                delete: self.delete.status(),
            },
        }
    }

    #[instrument(skip(self, draft))]
    pub async fn submit_create(&self, draft: MealDraft) -> Result<Meal, CatalogError> {
        ensure_idle(&self.create)?;
        let data = CreateMealData::try_from(draft).map_err(CatalogError::Validation)?;
        let pending = self.create.begin().ok_or(CatalogError::Busy(MutationKind::Create))?;

        match self.api.create_meal(&data).await {
            Ok(meal) => {
                self.queries.invalidate_meals();
                pending.succeed();
                self.close_modals();
                info!(id = ?meal.id, food_name = %meal.food_name, "meal created");
                Ok(meal)
            }
            Err(e) => {
                error!(error = %e, "failed to create meal");
                pending.fail(e.to_string());
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self, draft))]
    pub async fn submit_update(&self, id: &str, draft: MealDraft) -> Result<Meal, CatalogError> {
        ensure_idle(&self.update)?;
        let data = CreateMealData::try_from(draft).map_err(CatalogError::Validation)?;

        let selected = self
            .lock_store()
            .selected_meal()
            .filter(|meal| meal.id() == Some(id))
            .cloned();
        let original = match selected {
            Some(meal) => meal,
            None => self.meal(id).await?,
        };

        let changes = UpdateMealData::changes(&original, &data);
        if changes.is_empty() {
            info!("no changes to submit");
            self.close_modals();
            return Ok(original);
        }

        let pending = self.update.begin().ok_or(CatalogError::Busy(MutationKind::Update))?;
        match self.api.update_meal(id, &changes).await {
            Ok(meal) => {
                self.queries.invalidate_meals();
                self.queries.invalidate_meal(id);
                pending.succeed();
                self.close_modals();
                info!(food_name = %meal.food_name, "meal updated");
                Ok(meal)
            }
            Err(e) => {
                error!(error = %e, "failed to update meal");
                pending.fail(e.to_string());
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn confirm_delete(&self, id: &str) -> Result<(), CatalogError> {
        let pending = self.delete.begin().ok_or(CatalogError::Busy(MutationKind::Delete))?;
        match self.api.delete_meal(id).await {
            Ok(()) => {
                self.queries.invalidate_meals();
                self.queries.forget_meal(id);
                pending.succeed();
                self.close_modals();
                info!("meal deleted");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to delete meal");
                pending.fail(e.to_string());
                Err(e.into())
            }
        }
    }

    fn lock_store(&self) -> MutexGuard<'_, UiStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Duplicate submits are turned away before validation runs.
fn ensure_idle(tracker: &MutationTracker) -> Result<(), CatalogError> {
    if tracker.is_pending() {
        return Err(CatalogError::Busy(tracker.kind()));
    }
    Ok(())
}
