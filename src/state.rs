use crate::api::{HttpMealApi, MealApi};
use crate::catalog::Catalog;
use crate::config::AppConfig;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let api = Arc::new(HttpMealApi::new(&config)?) as Arc<dyn MealApi>;
        Ok(Self::with_api(config, api))
    }

    /// Any `MealApi` behind the catalog; tests pass in-memory fakes.
    pub fn with_api(config: AppConfig, api: Arc<dyn MealApi>) -> Self {
        let catalog = Arc::new(Catalog::new(api, &config));
        Self {
            config: Arc::new(config),
            catalog,
        }
    }
}
