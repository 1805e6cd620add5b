use serde::Serialize;
use time::OffsetDateTime;

use crate::meals::filters::Page;
use crate::meals::format::{
    format_rating, placeholder_food_image, placeholder_restaurant_logo, status_badge_class,
    status_text, truncate_text,
};
use crate::meals::model::{Meal, RestaurantStatus};

const RESTAURANT_NAME_MAX: usize = 20;

/// A meal as the card grid renders it.
#[derive(Debug, Serialize)]
pub struct MealView {
    pub id: Option<String>,
    pub food_name: String,
    pub food_rating: f64,
    pub rating_display: String,
    pub food_price: Option<f64>,
    pub food_image: String,
    pub food_image_src: String,
    pub restaurant_name: String,
    pub restaurant_name_short: String,
    pub restaurant_logo: String,
    pub restaurant_logo_src: String,
    pub restaurant_status: RestaurantStatus,
    pub status_badge_class: &'static str,
    pub status_text: &'static str,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl From<Meal> for MealView {
    fn from(meal: Meal) -> Self {
        let key = meal.placeholder_key().to_string();
        let image_src = or_placeholder(&meal.food_image, || placeholder_food_image(&key));
        let logo_src = or_placeholder(&meal.restaurant_logo, || placeholder_restaurant_logo(&key));

        Self {
            rating_display: format_rating(Some(meal.food_rating)),
            restaurant_name_short: truncate_text(&meal.restaurant_name, RESTAURANT_NAME_MAX),
            status_badge_class: status_badge_class(meal.restaurant_status),
            status_text: status_text(meal.restaurant_status),
            food_image_src: image_src,
            restaurant_logo_src: logo_src,
            id: meal.id,
            food_name: meal.food_name,
            food_rating: meal.food_rating,
            food_price: meal.food_price,
            food_image: meal.food_image,
            restaurant_name: meal.restaurant_name,
            restaurant_logo: meal.restaurant_logo,
            restaurant_status: meal.restaurant_status,
            created_at: meal.created_at,
        }
    }
}

fn or_placeholder(url: &str, placeholder: impl FnOnce() -> &'static str) -> String {
    if url.trim().is_empty() {
        placeholder().to_string()
    } else {
        url.to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct PageView {
    pub items: Vec<MealView>,
    pub total: usize,
    pub has_more: bool,
}

impl From<Page> for PageView {
    fn from(page: Page) -> Self {
        Self {
            items: page.items.into_iter().map(MealView::from).collect(),
            total: page.total,
            has_more: page.has_more,
        }
    }
}
