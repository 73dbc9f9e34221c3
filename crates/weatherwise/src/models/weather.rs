use serde::{Deserialize, Serialize};

/// Normalized current conditions for a single place, in metric units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub city: String,
    pub country: String,
    /// Degrees Celsius
    pub temperature: i64,
    /// Degrees Celsius
    pub feels_like: i64,
    pub description: String,
    /// Percent
    pub humidity: i64,
    /// Kilometers per hour
    pub wind_speed: i64,
    /// Coarse category such as "Rain" or "Clear"
    pub conditions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherError {
    pub error: String,
}

impl WeatherError {
    pub fn new<S: Into<String>>(error: S) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Outcome of a weather lookup, serialized as whichever shape it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeatherReport {
    Summary(WeatherSummary),
    Error(WeatherError),
}

impl WeatherReport {
    pub fn error<S: Into<String>>(error: S) -> Self {
        WeatherReport::Error(WeatherError::new(error))
    }

    pub fn as_summary(&self) -> Option<&WeatherSummary> {
        match self {
            WeatherReport::Summary(summary) => Some(summary),
            WeatherReport::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, WeatherReport::Error(_))
    }
}

impl From<WeatherSummary> for WeatherReport {
    fn from(summary: WeatherSummary) -> Self {
        WeatherReport::Summary(summary)
    }
}

impl From<WeatherError> for WeatherReport {
    fn from(error: WeatherError) -> Self {
        WeatherReport::Error(error)
    }
}
