use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{debug, instrument};

use crate::{
    catalog::UiSnapshot,
    error::CatalogError,
    meals::dto::PageView,
    state::AppState,
    store::{Action, FilterPatch},
};

pub fn modal_routes() -> Router<AppState> {
    Router::new()
        .route("/ui", get(snapshot))
        .route("/ui/modal/add", post(open_add))
        .route("/ui/modal/edit/:id", post(open_edit))
        .route("/ui/modal/delete/:id", post(open_delete))
        .route("/ui/modal/close", post(close_modals))
}

pub fn filter_routes() -> Router<AppState> {
    Router::new()
        .route("/ui/filters", patch(update_filters).delete(reset_filters))
        .route("/ui/load-more", post(load_more))
}

#[instrument(skip(state))]
pub async fn snapshot(State(state): State<AppState>) -> Json<UiSnapshot> {
    Json(state.catalog.snapshot())
}

#[instrument(skip(state))]
pub async fn open_add(State(state): State<AppState>) -> Json<UiSnapshot> {
    state.catalog.open_add();
    Json(state.catalog.snapshot())
}

#[instrument(skip(state))]
pub async fn open_edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UiSnapshot>, CatalogError> {
    state.catalog.open_edit(&id).await?;
    Ok(Json(state.catalog.snapshot()))
}

#[instrument(skip(state))]
pub async fn open_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UiSnapshot>, CatalogError> {
    state.catalog.open_delete(&id).await?;
    Ok(Json(state.catalog.snapshot()))
}

#[instrument(skip(state))]
pub async fn close_modals(State(state): State<AppState>) -> Json<UiSnapshot> {
    state.catalog.close_modals();
    Json(state.catalog.snapshot())
}

#[instrument(skip(state))]
pub async fn update_filters(
    State(state): State<AppState>,
    Json(changes): Json<FilterPatch>,
) -> Json<UiSnapshot> {
    debug!(?changes, "applying filter changes");
    state.catalog.dispatch(Action::PatchFilters(changes));
    Json(state.catalog.snapshot())
}

#[instrument(skip(state))]
pub async fn reset_filters(State(state): State<AppState>) -> Json<UiSnapshot> {
    state.catalog.dispatch(Action::ResetFilters);
    Json(state.catalog.snapshot())
}

#[instrument(skip(state))]
pub async fn load_more(State(state): State<AppState>) -> Result<Json<PageView>, CatalogError> {
    state.catalog.dispatch(Action::LoadMore);
    let page = state.catalog.visible_meals().await?;
    Ok(Json(page.into()))
}
