// prompt_template.rs

use serde::Serialize;
use tera::{Context, Error as TeraError, Tera};

const SYSTEM_TEMPLATE: &str = include_str!("prompts/system.md");

/// Temperature bands (°C) the assistant maps to clothing advice
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PackingGuide {
    pub cold_below: i64,
    pub warm_above: i64,
}

impl Default for PackingGuide {
    fn default() -> Self {
        Self {
            cold_below: 10,
            warm_above: 20,
        }
    }
}

pub fn load_prompt<T: Serialize>(template: &str, context_data: &T) -> Result<String, TeraError> {
    let mut tera = Tera::default();
    tera.add_raw_template("inline_template", template)?;
    let context = Context::from_serialize(context_data)?;
    let rendered = tera.render("inline_template", &context)?;
    Ok(rendered)
}

pub fn system_prompt(guide: &PackingGuide) -> Result<String, TeraError> {
    load_prompt(SYSTEM_TEMPLATE, guide)
}
