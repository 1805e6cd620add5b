use reqwest::Url;
use serde::Serialize;

use crate::meals::model::{MealDraft, RestaurantStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Checks every field of a draft independently. An empty result means the
/// draft can be submitted.
pub fn validate_meal_data(draft: &MealDraft) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if is_blank(&draft.food_name) {
        errors.push(ValidationError::new("food_name", "Food name is required"));
    }

    match draft.food_rating {
        None => errors.push(ValidationError::new("food_rating", "Food rating is required")),
        Some(rating) if rating.is_nan() => {
            errors.push(ValidationError::new("food_rating", "Food rating must be a number"))
        }
        Some(rating) if !(0.0..=5.0).contains(&rating) => errors.push(ValidationError::new(
            "food_rating",
            "Food rating must be between 0 and 5",
        )),
        Some(_) => {}
    }

    check_url(
        &mut errors,
        "food_image",
        &draft.food_image,
        "Food image URL is required",
        "Food image must be a valid URL",
    );

    if is_blank(&draft.restaurant_name) {
        errors.push(ValidationError::new("restaurant_name", "Restaurant name is required"));
    }

    check_url(
        &mut errors,
        "restaurant_logo",
        &draft.restaurant_logo,
        "Restaurant logo URL is required",
        "Restaurant logo must be a valid URL",
    );

    match draft.restaurant_status.as_deref() {
        None | Some("") => errors.push(ValidationError::new(
            "restaurant_status",
            "Restaurant status is required",
        )),
        Some(status) if RestaurantStatus::from_literal(status).is_none() => {
            errors.push(ValidationError::new(
                "restaurant_status",
                r#"Restaurant status must be "Open Now" or "Closed""#,
            ))
        }
        Some(_) => {}
    }

    errors
}

/// Strict absolute URL check: a scheme and a host are both required.
pub fn is_valid_url(s: &str) -> bool {
    Url::parse(s).map(|url| url.has_host()).unwrap_or(false)
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

fn check_url(
    errors: &mut Vec<ValidationError>,
    field: &'static str,
    value: &Option<String>,
    required: &'static str,
    invalid: &'static str,
) {
    if is_blank(value) {
        errors.push(ValidationError::new(field, required));
    } else if !value.as_deref().is_some_and(|url| is_valid_url(url.trim())) {
        errors.push(ValidationError::new(field, invalid));
    }
}
