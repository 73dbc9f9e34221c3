pub const GROQ_HOST: &str = "https://api.groq.com/openai";
pub const GROQ_MODEL: &str = "llama-3.3-70b-versatile";
pub const OPENWEATHER_HOST: &str = "https://api.openweathermap.org";

// Unified enum to wrap different provider configurations
#[derive(Clone)]
pub enum ProviderConfig {
    Groq(GroqProviderConfig),
}

/// Any OpenAI-compatible chat completion endpoint; Groq is the default host
#[derive(Clone)]
pub struct GroqProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl GroqProviderConfig {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            host: GROQ_HOST.to_string(),
            api_key: api_key.into(),
            model: GROQ_MODEL.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }
}

#[derive(Clone)]
pub struct WeatherConfig {
    pub host: String,
    /// Lookups report "not configured" instead of failing when this is unset
    pub api_key: Option<String>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            host: OPENWEATHER_HOST.to_string(),
            api_key: None,
        }
    }
}
