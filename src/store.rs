//! UI state container: which modal is open, for which meal, and what the
//! filter bar currently says. One instance per catalog; nothing global.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::meals::model::{Meal, StatusFilter};

/// At most one modal is open, and the edit/delete variants carry their meal.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Add,
    Edit(Meal),
    Delete(Meal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalKind {
    None,
    Add,
    Edit,
    Delete,
}

impl ModalState {
    pub fn kind(&self) -> ModalKind {
        match self {
            ModalState::Closed => ModalKind::None,
            ModalState::Add => ModalKind::Add,
            ModalState::Edit(_) => ModalKind::Edit,
            ModalState::Delete(_) => ModalKind::Delete,
        }
    }

    pub fn selected_meal(&self) -> Option<&Meal> {
        match self {
            ModalState::Edit(meal) | ModalState::Delete(meal) => Some(meal),
            ModalState::Closed | ModalState::Add => None,
        }
    }

    pub fn is_add_open(&self) -> bool {
        matches!(self, ModalState::Add)
    }

    pub fn is_edit_open(&self) -> bool {
        matches!(self, ModalState::Edit(_))
    }

    pub fn is_delete_open(&self) -> bool {
        matches!(self, ModalState::Delete(_))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchFilterState {
    pub search_query: String,
    pub selected_status: StatusFilter,
    pub min_rating: f64,
}

/// Partial filter update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FilterPatch {
    #[serde(default)]
    pub search_query: Option<String>,
    #[serde(default)]
    pub selected_status: Option<StatusFilter>,
    #[serde(default)]
    pub min_rating: Option<f64>,
}

impl FilterPatch {
    pub fn is_empty(&self) -> bool {
        self.search_query.is_none() && self.selected_status.is_none() && self.min_rating.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    OpenAdd,
    OpenEdit(Meal),
    OpenDelete(Meal),
    CloseAll,
    SetSearchQuery(String),
    SetSelectedStatus(StatusFilter),
    SetMinRating(f64),
    /// Several filter fields at once, as one transition.
    PatchFilters(FilterPatch),
    ResetFilters,
    LoadMore,
}

#[derive(Debug, Clone)]
pub struct UiStore {
    modal: ModalState,
    filters: SearchFilterState,
    page_size: usize,
    visible_count: usize,
}

impl UiStore {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            modal: ModalState::Closed,
            filters: SearchFilterState::default(),
            page_size,
            visible_count: page_size,
        }
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn selected_meal(&self) -> Option<&Meal> {
        self.modal.selected_meal()
    }

    pub fn filters(&self) -> &SearchFilterState {
        &self.filters
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    /// Applies one action as a single transition.
    pub fn dispatch(&mut self, action: Action) {
        debug!(?action, "ui action");
        match action {
            Action::OpenAdd => self.modal = ModalState::Add,
            Action::OpenEdit(meal) => self.modal = ModalState::Edit(meal),
            Action::OpenDelete(meal) => self.modal = ModalState::Delete(meal),
            Action::CloseAll => self.modal = ModalState::Closed,
            Action::SetSearchQuery(query) => {
                self.filters.search_query = query;
                self.visible_count = self.page_size;
            }
            Action::SetSelectedStatus(status) => {
                self.filters.selected_status = status;
                self.visible_count = self.page_size;
            }
            Action::SetMinRating(rating) => {
                self.filters.min_rating = finite_or_zero(rating);
                self.visible_count = self.page_size;
            }
            Action::PatchFilters(patch) => {
                if patch.is_empty() {
                    return;
                }
                if let Some(query) = patch.search_query {
                    self.filters.search_query = query;
                }
                if let Some(status) = patch.selected_status {
                    self.filters.selected_status = status;
                }
                if let Some(rating) = patch.min_rating {
                    self.filters.min_rating = finite_or_zero(rating);
                }
                self.visible_count = self.page_size;
            }
            Action::ResetFilters => {
                self.filters = SearchFilterState::default();
                self.visible_count = self.page_size;
            }
            Action::LoadMore => {
                self.visible_count = self.visible_count.saturating_add(self.page_size)
            }
        }
    }
}

fn finite_or_zero(rating: f64) -> f64 {
    if rating.is_finite() {
        rating
    } else {
        0.0
    }
}

impl Default for UiStore {
    fn default() -> Self {
        Self::new(8)
    }
}
