pub mod assistant;
pub mod augment;
pub mod errors;
pub mod intent;
pub mod models;
pub mod prompt_template;
pub mod protocol;
pub mod providers;
pub mod weather;
