use crate::meals::model::{Meal, MealDraft, RestaurantStatus};

fn meal(id: &str, food: &str, rating: f64, restaurant: &str, status: RestaurantStatus) -> Meal {
    let slug = food.to_lowercase().replace(' ', "-");
    Meal {
        id: Some(id.into()),
        food_name: food.into(),
        food_rating: rating,
        food_image: format!("https://example.com/{slug}.jpg"),
        food_price: Some(12.5),
        restaurant_name: restaurant.into(),
        restaurant_logo: format!("https://example.com/{slug}-logo.png"),
        restaurant_status: status,
        created_at: None,
        updated_at: None,
    }
}

pub fn sample_meal() -> Meal {
    meal("1", "Bow Lasagna", 4.6, "Subway", RestaurantStatus::OpenNow)
}

pub fn mock_meals() -> Vec<Meal> {
    vec![
        sample_meal(),
        meal("2", "Avocado Smoothie", 4.2, "Juice Bar", RestaurantStatus::Closed),
        meal("3", "Pancake Stack", 4.9, "Breakfast Cafe", RestaurantStatus::OpenNow),
    ]
}

pub fn valid_draft(name: &str) -> MealDraft {
    MealDraft {
        food_name: Some(name.into()),
        food_rating: Some(4.0),
        food_image: Some("https://example.com/new.jpg".into()),
        restaurant_name: Some("New Place".into()),
        restaurant_logo: Some("https://example.com/new-logo.png".into()),
        restaurant_status: Some("Open Now".into()),
    }
}
