use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::meals::validation::{validate_meal_data, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestaurantStatus {
    #[serde(rename = "Open Now")]
    OpenNow,
    #[serde(rename = "Closed")]
    Closed,
}

impl RestaurantStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            RestaurantStatus::OpenNow => "Open Now",
            RestaurantStatus::Closed => "Closed",
        }
    }

    /// Exact literal match, no case folding.
    pub fn from_literal(s: &str) -> Option<Self> {
        match s {
            "Open Now" => Some(RestaurantStatus::OpenNow),
            "Closed" => Some(RestaurantStatus::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for RestaurantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status criterion of the filter bar: either every status or one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Only(RestaurantStatus),
}

impl TryFrom<String> for StatusFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "all" {
            return Ok(StatusFilter::All);
        }
        RestaurantStatus::from_literal(&value)
            .map(StatusFilter::Only)
            .ok_or_else(|| format!(r#"unknown status filter "{value}", expected "all", "Open Now" or "Closed""#))
    }
}

impl From<StatusFilter> for String {
    fn from(value: StatusFilter) -> Self {
        match value {
            StatusFilter::All => "all".to_string(),
            StatusFilter::Only(status) => status.as_str().to_string(),
        }
    }
}

/// A catalog record as the rest of the crate sees it, after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub food_name: String,
    pub food_rating: f64,
    pub food_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_price: Option<f64>,
    pub restaurant_name: String,
    pub restaurant_logo: String,
    pub restaurant_status: RestaurantStatus,
    #[serde(
        rename = "createdAt",
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(
        rename = "updatedAt",
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

impl Meal {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Key used to derive per-record placeholders; falls back to the name for drafts.
    pub fn placeholder_key(&self) -> &str {
        self.id().unwrap_or(&self.food_name)
    }
}

/// In-progress form state. Every field may be missing or malformed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealDraft {
    #[serde(default, deserialize_with = "text_input")]
    pub food_name: Option<String>,
    #[serde(default, deserialize_with = "rating_input")]
    pub food_rating: Option<f64>,
    #[serde(default, deserialize_with = "text_input")]
    pub food_image: Option<String>,
    #[serde(default, deserialize_with = "text_input")]
    pub restaurant_name: Option<String>,
    #[serde(default, deserialize_with = "text_input")]
    pub restaurant_logo: Option<String>,
    #[serde(default, deserialize_with = "text_input")]
    pub restaurant_status: Option<String>,
}

impl MealDraft {
    /// Pre-fills an edit form with the stored values.
    pub fn from_meal(meal: &Meal) -> Self {
        Self {
            food_name: Some(meal.food_name.clone()),
            food_rating: Some(meal.food_rating),
            food_image: Some(meal.food_image.clone()),
            restaurant_name: Some(meal.restaurant_name.clone()),
            restaurant_logo: Some(meal.restaurant_logo.clone()),
            restaurant_status: Some(meal.restaurant_status.as_str().to_string()),
        }
    }
}

/// Form inputs arrive as numbers or as the raw text of a number field.
/// Blank text counts as missing; anything else that is not a number becomes
/// NaN so validation reports it.
fn rating_input<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::Number(n) => Some(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                Some(text.parse::<f64>().unwrap_or(f64::NAN))
            }
        }
        _ => Some(f64::NAN),
    })
}

/// Text inputs. Numbers and booleans keep their literal text; lists and
/// objects count as blank so validation reports the field.
fn text_input<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(_) | Value::Object(_) => Some(String::new()),
    })
}

/// Body of `POST /Food`. Only built from a draft that validated clean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMealData {
    pub food_name: String,
    pub food_rating: f64,
    pub food_image: String,
    pub restaurant_name: String,
    pub restaurant_logo: String,
    pub restaurant_status: RestaurantStatus,
}

impl TryFrom<MealDraft> for CreateMealData {
    type Error = Vec<ValidationError>;

    fn try_from(draft: MealDraft) -> Result<Self, Self::Error> {
        let errors = validate_meal_data(&draft);
        let status = draft
            .restaurant_status
            .as_deref()
            .and_then(RestaurantStatus::from_literal);
        // a missing rating or status is always among `errors`
        let (Some(food_rating), Some(restaurant_status)) = (draft.food_rating, status) else {
            return Err(errors);
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        let text = |value: Option<String>| value.map(|s| s.trim().to_string()).unwrap_or_default();
        Ok(Self {
            food_name: text(draft.food_name),
            food_rating,
            food_image: text(draft.food_image),
            restaurant_name: text(draft.restaurant_name),
            restaurant_logo: text(draft.restaurant_logo),
            restaurant_status,
        })
    }
}

/// Body of `PUT /Food/:id`. Absent fields are left untouched server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateMealData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_status: Option<RestaurantStatus>,
}

impl UpdateMealData {
    /// Only the fields of `next` that differ from `original`.
    pub fn changes(original: &Meal, next: &CreateMealData) -> Self {
        fn changed<T: PartialEq + Clone>(before: &T, after: &T) -> Option<T> {
            (before != after).then(|| after.clone())
        }

        Self {
            food_name: changed(&original.food_name, &next.food_name),
            food_rating: changed(&original.food_rating, &next.food_rating),
            food_image: changed(&original.food_image, &next.food_image),
            restaurant_name: changed(&original.restaurant_name, &next.restaurant_name),
            restaurant_logo: changed(&original.restaurant_logo, &next.restaurant_logo),
            restaurant_status: changed(&original.restaurant_status, &next.restaurant_status),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
