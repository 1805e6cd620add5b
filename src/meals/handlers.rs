use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{error, instrument};

use crate::{
    catalog::Catalog,
    error::CatalogError,
    meals::{
        dto::{MealView, PageView},
        model::MealDraft,
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/meals/:id", get(get_meal))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal))
        .route("/meals/:id", put(update_meal).delete(delete_meal))
}

#[instrument(skip(state))]
pub async fn list_meals(State(state): State<AppState>) -> Result<Json<PageView>, CatalogError> {
    let page = state.catalog.visible_meals().await?;
    Ok(Json(page.into()))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MealView>, CatalogError> {
    let meal = state.catalog.meal(&id).await?;
    Ok(Json(meal.into()))
}

#[instrument(skip(state, draft))]
pub async fn create_meal(
    State(state): State<AppState>,
    Json(draft): Json<MealDraft>,
) -> Result<(StatusCode, Json<MealView>), CatalogError> {
    let meal = detached(&state, |catalog| async move { catalog.submit_create(draft).await }).await?;
    Ok((StatusCode::CREATED, Json(meal.into())))
}

#[instrument(skip(state, draft))]
pub async fn update_meal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<MealDraft>,
) -> Result<Json<MealView>, CatalogError> {
    let meal = detached(&state, |catalog| async move {
        catalog.submit_update(&id, draft).await
    })
    .await?;
    Ok(Json(meal.into()))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, CatalogError> {
    detached(&state, |catalog| async move { catalog.confirm_delete(&id).await }).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Runs a write on its own task so a dropped connection does not abort it.
async fn detached<F, Fut, T>(state: &AppState, write: F) -> Result<T, CatalogError>
where
    F: FnOnce(Arc<Catalog>) -> Fut,
    Fut: Future<Output = Result<T, CatalogError>> + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::spawn(write(Arc::clone(&state.catalog)));
    task.await.map_err(|e| {
        error!(error = %e, "write task failed");
        CatalogError::Internal(e.to_string())
    })?
}
