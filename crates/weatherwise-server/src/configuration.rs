use crate::error::{to_env_var, ConfigError};
use config::{Config, Environment};
use serde::Deserialize;
use std::env;
use weatherwise::providers::configs::{
    GroqProviderConfig, ProviderConfig, WeatherConfig, GROQ_HOST, GROQ_MODEL, OPENWEATHER_HOST,
};

#[derive(Debug, Default, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_provider_host")]
    pub host: String,
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<i32>,
}

impl ProviderSettings {
    // Convert to the weatherwise ProviderConfig
    pub fn into_config(self) -> ProviderConfig {
        ProviderConfig::Groq(GroqProviderConfig {
            host: self.host,
            api_key: self.api_key,
            model: self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        })
    }
}

#[derive(Deserialize)]
pub struct WeatherSettings {
    #[serde(default = "default_weather_host")]
    pub host: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            host: default_weather_host(),
            api_key: None,
        }
    }
}

impl WeatherSettings {
    pub fn into_config(self) -> WeatherConfig {
        WeatherConfig {
            host: self.host,
            api_key: self.api_key.filter(|key| !key.is_empty()),
        }
    }
}

#[derive(Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub provider: ProviderSettings,
    #[serde(default)]
    pub weather: WeatherSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        // Start with default configuration
        let mut builder = Config::builder()
            // Server defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            // Provider defaults
            .set_default("provider.host", default_provider_host())?
            .set_default("provider.model", default_model())?
            // Weather defaults
            .set_default("weather.host", default_weather_host())?;

        // The conventional key variables sit below the prefixed ones
        if let Some(key) = non_empty_var("GROQ_API_KEY") {
            builder = builder.set_default("provider.api_key", key)?;
        }
        if let Some(key) = non_empty_var("OPENWEATHER_API_KEY") {
            builder = builder.set_default("weather.api_key", key)?;
        }

        let config = builder
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix("WEATHERWISE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Try to deserialize the configuration
        let result: Result<Self, config::ConfigError> = config.try_deserialize();

        // Handle missing field errors specially
        match result {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                let error_str = err.to_string();
                if let Some(field) = missing_field(&error_str) {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else if let config::ConfigError::NotFound(field) = &err {
                    Err(ConfigError::MissingEnvVar {
                        env_var: to_env_var(field),
                    })
                } else {
                    Err(ConfigError::Other(err))
                }
            }
        }
    }
}

// Extract field name from error message "missing field `api_key`"
fn missing_field(error: &str) -> Option<&str> {
    let rest = &error[error.find("missing field `")? + "missing field `".len()..];
    rest.split('`').next()
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_model() -> String {
    GROQ_MODEL.to_string()
}

fn default_provider_host() -> String {
    GROQ_HOST.to_string()
}

fn default_weather_host() -> String {
    OPENWEATHER_HOST.to_string()
}
