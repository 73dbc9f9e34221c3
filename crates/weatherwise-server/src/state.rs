use std::sync::Arc;

use anyhow::Result;
use weatherwise::assistant::Assistant;
use weatherwise::providers::factory;
use weatherwise::weather::OpenWeatherClient;

use crate::configuration::Settings;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
}

impl AppState {
    pub fn new(assistant: Assistant) -> Self {
        Self {
            assistant: Arc::new(assistant),
        }
    }

    pub fn from_settings(settings: Settings) -> Result<Self> {
        let provider = factory::get_provider(settings.provider.into_config())?;
        let weather = OpenWeatherClient::new(settings.weather.into_config())?;
        let assistant = Assistant::new(provider, Box::new(weather))?;
        Ok(Self::new(assistant))
    }
}
