use serde::Serialize;

use crate::meals::model::{Meal, StatusFilter};

/// Keeps meals whose food or restaurant name contains `query`, ignoring case.
/// A blank query keeps everything.
pub fn filter_by_search(mut meals: Vec<Meal>, query: &str) -> Vec<Meal> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return meals;
    }

    meals.retain(|meal| {
        meal.food_name.to_lowercase().contains(&query)
            || meal.restaurant_name.to_lowercase().contains(&query)
    });
    meals
}

pub fn filter_by_status(mut meals: Vec<Meal>, status: StatusFilter) -> Vec<Meal> {
    if let StatusFilter::Only(status) = status {
        meals.retain(|meal| meal.restaurant_status == status);
    }
    meals
}

/// Inclusive lower bound on the rating; zero disables the filter.
pub fn filter_by_rating(mut meals: Vec<Meal>, min_rating: f64) -> Vec<Meal> {
    if min_rating == 0.0 {
        return meals;
    }

    meals.retain(|meal| meal.food_rating >= min_rating);
    meals
}

/// Search, then status, then rating.
pub fn apply_all_filters(
    meals: Vec<Meal>,
    query: &str,
    status: StatusFilter,
    min_rating: f64,
) -> Vec<Meal> {
    let meals = filter_by_search(meals, query);
    let meals = filter_by_status(meals, status);
    filter_by_rating(meals, min_rating)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub items: Vec<Meal>,
    pub total: usize,
    pub has_more: bool,
}

/// Client-side slice of an already filtered list.
pub fn paginate(mut meals: Vec<Meal>, visible: usize) -> Page {
    let total = meals.len();
    meals.truncate(visible);
    Page {
        has_more: total > meals.len(),
        total,
        items: meals,
    }
}
