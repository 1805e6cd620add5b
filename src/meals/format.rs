use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::meals::model::RestaurantStatus;

const FOOD_PLACEHOLDERS: &[&str] = &[
    "/images/food/burger.jpg",
    "/images/food/pasta.jpg",
    "/images/food/pizza.jpg",
    "/images/food/salad.jpg",
    "/images/food/noodles.jpg",
    "/images/food/pancakes.jpg",
];

const RESTAURANT_PLACEHOLDERS: &[&str] = &[
    "/images/restaurants/bistro.png",
    "/images/restaurants/diner.png",
    "/images/restaurants/grill.png",
    "/images/restaurants/kitchen.png",
];

/// One decimal place. Missing or NaN ratings show as "0.0".
pub fn format_rating(rating: Option<f64>) -> String {
    match rating {
        Some(rating) if !rating.is_nan() => format!("{rating:.1}"),
        _ => "0.0".to_string(),
    }
}

/// Cuts after `max_length` characters and appends "...".
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let mut out: String = text.chars().take(max_length).collect();
    out.push_str("...");
    out
}

pub fn status_badge_class(status: RestaurantStatus) -> &'static str {
    match status {
        RestaurantStatus::OpenNow => "food-badge--open",
        RestaurantStatus::Closed => "food-badge--closed",
    }
}

pub fn status_text(status: RestaurantStatus) -> &'static str {
    status.as_str()
}

/// Same key, same placeholder, on every render.
pub fn placeholder_food_image(key: &str) -> &'static str {
    pick(FOOD_PLACEHOLDERS, key)
}

pub fn placeholder_restaurant_logo(key: &str) -> &'static str {
    pick(RESTAURANT_PLACEHOLDERS, key)
}

fn pick(choices: &'static [&'static str], key: &str) -> &'static str {
    choices
        .choose(&mut record_rng(key))
        .copied()
        .unwrap_or_default()
}

/// Deterministic RNG for per-record defaults (FNV-1a of the key as seed).
pub(crate) fn record_rng(key: &str) -> StdRng {
    let seed = key.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
    });
    StdRng::seed_from_u64(seed)
}
