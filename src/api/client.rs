use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::meals::model::{CreateMealData, Meal, UpdateMealData};
use crate::meals::normalize::{normalize_meal, normalize_meals, unwrap_envelope};

/// CRUD over the single `/Food` resource. Every returned meal is normalized.
#[async_trait]
pub trait MealApi: Send + Sync {
    async fn list_meals(&self) -> Result<Vec<Meal>, ApiError>;
    async fn get_meal(&self, id: &str) -> Result<Meal, ApiError>;
    async fn create_meal(&self, data: &CreateMealData) -> Result<Meal, ApiError>;
    async fn update_meal(&self, id: &str, data: &UpdateMealData) -> Result<Meal, ApiError>;
    async fn delete_meal(&self, id: &str) -> Result<(), ApiError>;
}

#[derive(Clone)]
pub struct HttpMealApi {
    client: Client,
    base: Url,
    resource: String,
}

impl HttpMealApi {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.http_timeout()).build()?;
        Self::with_client(client, &config.api_url, &config.resource)
    }

    pub fn with_client(client: Client, base_url: &str, resource: &str) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() || !base.has_host() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            client,
            base,
            resource: resource.to_string(),
        })
    }

    fn url(&self, id: Option<&str>) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?;
            segments.pop_if_empty().push(&self.resource);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, id: Option<&str>) -> Result<RequestBuilder, ApiError> {
        let url = self.url(id)?;
        debug!(%method, %url, "meal service request");
        Ok(self.client.request(method, url))
    }
}

#[async_trait]
impl MealApi for HttpMealApi {
    #[instrument(skip(self))]
    async fn list_meals(&self) -> Result<Vec<Meal>, ApiError> {
        let resp = self.request(Method::GET, None)?.send().await?;
        let body = success_json(resp, "Failed to fetch meals").await?;
        let meals = normalize_meals(body);
        debug!(count = meals.len(), "meals fetched");
        Ok(meals)
    }

    #[instrument(skip(self))]
    async fn get_meal(&self, id: &str) -> Result<Meal, ApiError> {
        let resp = self.request(Method::GET, Some(id))?.send().await?;
        let body = success_json(resp, "Failed to fetch meal").await?;
        single_meal(body)
    }

    #[instrument(skip(self, data), fields(food_name = %data.food_name))]
    async fn create_meal(&self, data: &CreateMealData) -> Result<Meal, ApiError> {
        let resp = self.request(Method::POST, None)?.json(data).send().await?;
        let body = success_json(resp, "Failed to create meal").await?;
        single_meal(body)
    }

    #[instrument(skip(self, data))]
    async fn update_meal(&self, id: &str, data: &UpdateMealData) -> Result<Meal, ApiError> {
        let resp = self.request(Method::PUT, Some(id))?.json(data).send().await?;
        let body = success_json(resp, "Failed to update meal").await?;
        single_meal(body)
    }

    #[instrument(skip(self))]
    async fn delete_meal(&self, id: &str) -> Result<(), ApiError> {
        let resp = self.request(Method::DELETE, Some(id))?.send().await?;
        if !resp.status().is_success() {
            return Err(status_error(resp, "Failed to delete meal").await);
        }
        Ok(())
    }
}

async fn success_json(resp: Response, fallback: &str) -> Result<Value, ApiError> {
    if !resp.status().is_success() {
        return Err(status_error(resp, fallback).await);
    }
    let body = resp.json::<Value>().await?;
    Ok(body)
}

/// A saved meal must come back with an id, otherwise it cannot be edited or deleted.
fn single_meal(body: Value) -> Result<Meal, ApiError> {
    let body = unwrap_envelope(body);
    let meal = normalize_meal(&body)
        .ok_or_else(|| ApiError::Decode(format!("expected a meal object, got {body}")))?;
    if meal.id().is_none() {
        return Err(ApiError::Decode(format!("meal response has no id: {body}")));
    }
    Ok(meal)
}

/// Message precedence: JSON `message` field, HTTP status text, per-call fallback.
async fn status_error(resp: Response, fallback: &str) -> ApiError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
        .filter(|m| !m.trim().is_empty())
        .or_else(|| status.canonical_reason().map(str::to_owned))
        .unwrap_or_else(|| fallback.to_string());

    debug!(status = status.as_u16(), %message, "meal service returned an error");
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}
