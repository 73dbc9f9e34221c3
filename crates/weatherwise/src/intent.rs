//! Heuristic detection of weather questions and the place they are about.
//!
//! Only English prepositions and capitalized place names are recognized. Lower-case or
//! non-Latin names are not extracted.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::message::{Message, Role};

const WEATHER_KEYWORDS: [&str; 8] = [
    "weather",
    "pack",
    "bring",
    "temperature",
    "rain",
    "umbrella",
    "clothes",
    "wear",
];

lazy_static! {
    static ref CITY_PATTERN: Regex =
        Regex::new(r"(?:in|to|for)\s+([A-Z][a-zA-Z\s]+?)(?:\s+this|\s+tomorrow|$|\?|\.)")
            .unwrap();
}

/// Decides whether a message needs weather context and which place it refers to
pub trait IntentClassifier: Send + Sync {
    fn needs_weather_context(&self, message: &Message) -> bool;

    fn extract_city(&self, text: &str) -> Option<String>;
}

/// Keyword and pattern matching, no language understanding
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordIntent;

impl IntentClassifier for KeywordIntent {
    fn needs_weather_context(&self, message: &Message) -> bool {
        if message.role != Role::User {
            return false;
        }
        let content = message.content.to_lowercase();
        WEATHER_KEYWORDS
            .iter()
            .any(|keyword| content.contains(keyword))
    }

    fn extract_city(&self, text: &str) -> Option<String> {
        CITY_PATTERN
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map(|city| city.as_str().trim().to_string())
            .filter(|city| !city.is_empty())
    }
}
