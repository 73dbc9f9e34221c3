use crate::models::message::Message;
use crate::models::weather::WeatherReport;

/// Name the weather result is attributed to in the conversation
pub const WEATHER_FUNCTION_NAME: &str = "getWeather";

/// Append the weather report, if any, to the conversation as a function result.
pub fn augment(mut history: Vec<Message>, report: Option<&WeatherReport>) -> Vec<Message> {
    if let Some(report) = report {
        // Both report shapes are plain structs of strings and integers
        let content = serde_json::to_string(report).unwrap_or_default();
        history.push(Message::function(WEATHER_FUNCTION_NAME, content));
    }
    history
}
