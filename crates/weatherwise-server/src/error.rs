use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },
    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

/// Environment variable to set for a missing settings field
pub fn to_env_var(field: &str) -> String {
    match field {
        "api_key" | "provider.api_key" => "GROQ_API_KEY".to_string(),
        "weather.api_key" => "OPENWEATHER_API_KEY".to_string(),
        _ => format!(
            "WEATHERWISE_{}",
            field.to_uppercase().replace('.', "__")
        ),
    }
}
