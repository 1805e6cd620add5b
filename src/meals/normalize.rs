//! Maps the heterogeneous records the `/Food` backend returns onto [`Meal`].
//!
//! Every canonical field has an ordered list of accepted source keys
//! ([`FIELD_ALIASES`]); the first key present with a non-null value wins.
//! Dotted keys reach into a nested object (`restaurant.name`). Missing or
//! unusable values fall back to the defaults below and are logged at debug
//! level, never treated as errors.

use std::collections::HashMap;

use lazy_static::lazy_static;
use rand::Rng;
use serde_json::{Map, Value};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::{debug, warn};

use crate::meals::format::record_rng;
use crate::meals::model::{Meal, RestaurantStatus};
use crate::meals::validation::is_valid_url;

pub const DEFAULT_FOOD_NAME: &str = "Unknown";
pub const DEFAULT_RESTAURANT_NAME: &str = "Unknown Restaurant";
pub const DEFAULT_RATING: f64 = 0.0;
pub const DEFAULT_STATUS: RestaurantStatus = RestaurantStatus::OpenNow;
/// Placeholder prices are drawn from this range, in cents.
pub const PLACEHOLDER_PRICE_CENTS: std::ops::Range<u32> = 500..3000;

pub struct FieldAliases {
    pub field: &'static str,
    pub keys: &'static [&'static str],
}

pub const FIELD_ALIASES: &[FieldAliases] = &[
    FieldAliases { field: "id", keys: &["id", "_id"] },
    FieldAliases { field: "food_name", keys: &["food_name", "name", "foodName", "title"] },
    FieldAliases { field: "food_rating", keys: &["food_rating", "rating", "foodRating"] },
    FieldAliases { field: "food_image", keys: &["food_image", "image", "foodImage", "avatar"] },
    FieldAliases { field: "food_price", keys: &["food_price", "price", "Price"] },
    FieldAliases {
        field: "restaurant_name",
        keys: &["restaurant_name", "restaurantName", "restaurant.name"],
    },
    FieldAliases {
        field: "restaurant_logo",
        keys: &["restaurant_logo", "logo", "restaurantLogo", "restaurant.logo"],
    },
    FieldAliases {
        field: "restaurant_status",
        keys: &["restaurant_status", "status", "restaurantStatus", "restaurant.status", "open"],
    },
    FieldAliases { field: "created_at", keys: &["createdAt", "created_at"] },
    FieldAliases { field: "updated_at", keys: &["updatedAt", "updated_at"] },
];

lazy_static! {
    static ref STATUS_ALIASES: HashMap<&'static str, RestaurantStatus> = HashMap::from([
        ("open now", RestaurantStatus::OpenNow),
        ("open", RestaurantStatus::OpenNow),
        ("opened", RestaurantStatus::OpenNow),
        ("closed", RestaurantStatus::Closed),
        ("close", RestaurantStatus::Closed),
    ]);
}

/// `{"data": x}` envelopes are unwrapped; anything else passes through.
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.get("data").is_some_and(|v| !v.is_null()) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Normalizes a list response. Entries that are not objects, or that carry
/// no id, are skipped. A body that is not a list yields no meals.
pub fn normalize_meals(body: Value) -> Vec<Meal> {
    match unwrap_envelope(body) {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match normalize_meal(item) {
                Some(meal) if meal.id().is_some() => Some(meal),
                Some(_) => {
                    warn!(entry = %item, "skipping meal entry without an id");
                    None
                }
                None => {
                    warn!(entry = %item, "skipping non-object meal entry");
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        other => {
            warn!(kind = json_kind(&other), body = %other, "meal list response is not an array");
            Vec::new()
        }
    }
}

/// Normalizes a single record; `None` when `raw` is not a JSON object.
pub fn normalize_meal(raw: &Value) -> Option<Meal> {
    let record = raw.as_object()?;

    let id = lookup(record, "id").and_then(|value| match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    let food_name = text(record, "food_name").unwrap_or_else(|| {
        debug!(?id, "food_name missing, using default");
        DEFAULT_FOOD_NAME.to_string()
    });

    let food_rating = number(record, "food_rating").unwrap_or_else(|| {
        debug!(?id, "food_rating missing, using default");
        DEFAULT_RATING
    });

    let placeholder_key = id.clone().unwrap_or_else(|| food_name.clone());
    let food_price = number(record, "food_price").or_else(|| {
        let price = placeholder_price(&placeholder_key);
        debug!(?id, price, "food_price missing, using placeholder");
        Some(price)
    });

    let restaurant_name = text(record, "restaurant_name").unwrap_or_else(|| {
        debug!(?id, "restaurant_name missing, using default");
        DEFAULT_RESTAURANT_NAME.to_string()
    });

    let restaurant_status = lookup(record, "restaurant_status")
        .and_then(status)
        .unwrap_or_else(|| {
            debug!(?id, "restaurant_status missing or unknown, using default");
            DEFAULT_STATUS
        });

    Some(Meal {
        food_image: url(record, "food_image"),
        restaurant_logo: url(record, "restaurant_logo"),
        created_at: lookup(record, "created_at").and_then(timestamp),
        updated_at: lookup(record, "updated_at").and_then(timestamp),
        id,
        food_name,
        food_rating,
        food_price,
        restaurant_name,
        restaurant_status,
    })
}

/// Stable for a given key, so repeated fetches of one record agree.
pub fn placeholder_price(key: &str) -> f64 {
    let cents = record_rng(key).gen_range(PLACEHOLDER_PRICE_CENTS);
    f64::from(cents) / 100.0
}

fn lookup<'a>(record: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    let aliases = FIELD_ALIASES.iter().find(|a| a.field == field)?;
    aliases.keys.iter().find_map(|key| {
        let mut parts = key.split('.');
        let first = record.get(parts.next()?)?;
        let value = parts.try_fold(first, |value, part| value.get(part))?;
        (!value.is_null()).then_some(value)
    })
}

fn text(record: &Map<String, Value>, field: &str) -> Option<String> {
    match lookup(record, field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn number(record: &Map<String, Value>, field: &str) -> Option<f64> {
    let n = match lookup(record, field)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Unset or malformed URLs become "", which the view replaces with a placeholder.
fn url(record: &Map<String, Value>, field: &str) -> String {
    match text(record, field) {
        Some(url) if is_valid_url(&url) => url,
        Some(url) => {
            debug!(field, %url, "dropping invalid url");
            String::new()
        }
        None => String::new(),
    }
}

fn status(value: &Value) -> Option<RestaurantStatus> {
    match value {
        Value::String(s) => STATUS_ALIASES.get(s.trim().to_lowercase().as_str()).copied(),
        Value::Bool(true) => Some(RestaurantStatus::OpenNow),
        Value::Bool(false) => Some(RestaurantStatus::Closed),
        _ => None,
    }
}

fn timestamp(value: &Value) -> Option<OffsetDateTime> {
    match value {
        Value::String(s) => OffsetDateTime::parse(s.trim(), &Rfc3339).ok(),
        Value::Number(n) => OffsetDateTime::from_unix_timestamp(n.as_i64()?).ok(),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
