//! Response Decoder: turns raw completion text into typed recipes.
//!
//! Only syntactically invalid JSON is an error. Anything that parses is
//! coerced field by field: wrong types become empty values, blank names drop
//! the recipe, and the list is capped at `MAX_RECIPES`.

use serde_json::Value;
use tracing::debug;

use crate::generation::error::DecodeError;
use crate::generation::prompts::MAX_RECIPES;
use crate::llm_client::strip_json_fences;
use crate::models::recipe::{RecipeDetail, RecipeSummary};

fn parse(raw: &str) -> Result<Value, DecodeError> {
    serde_json::from_str(strip_json_fences(raw)).map_err(|e| {
        debug!("Completion text is not JSON: {e}");
        DecodeError::Unparseable
    })
}

/// Trimmed string value, or "" for anything that is not a string.
fn coerce_string(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Trimmed, non-blank string elements. Non-arrays yield an empty list.
fn coerce_string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Decodes a list-pipeline response shaped as `{"recipes":[...]}`.
pub fn decode_list(raw: &str) -> Result<Vec<RecipeSummary>, DecodeError> {
    let payload = parse(raw)?;

    let Some(recipes) = payload.get("recipes").and_then(Value::as_array) else {
        debug!("Completion JSON has no recipes array");
        return Ok(Vec::new());
    };

    Ok(recipes
        .iter()
        .map(|recipe| RecipeSummary {
            name: coerce_string(recipe.get("name")),
            description: coerce_string(recipe.get("description")),
            instructions: coerce_string(recipe.get("instructions")),
            ingredients: coerce_string_list(recipe.get("ingredients")),
        })
        .filter(|recipe| !recipe.name.is_empty())
        .take(MAX_RECIPES)
        .collect())
}

/// Decodes a detail-pipeline response. A non-string `name` falls back to the
/// drink that was asked for.
pub fn decode_detail(raw: &str, requested_name: &str) -> Result<RecipeDetail, DecodeError> {
    let payload = parse(raw)?;

    let name = match payload.get("name").and_then(Value::as_str) {
        Some(name) => name.trim().to_string(),
        None => requested_name.to_string(),
    };

    Ok(RecipeDetail {
        name,
        description: coerce_string(payload.get("description")),
        ingredients: coerce_string_list(payload.get("ingredients")),
        steps: coerce_string_list(payload.get("steps")),
    })
}
