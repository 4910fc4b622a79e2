// All LLM prompt constants for the recipe pipelines, plus the two builders.
// Builders are pure: same inputs, same string.

use crate::generation::error::RecipeError;
use crate::models::recipe::Preference;

/// Upper bound on recipes requested from (and accepted back from) the model.
pub const MAX_RECIPES: usize = 5;

pub const EMPTY_INGREDIENTS_MESSAGE: &str =
    "Add at least one ingredient before generating recipes.";
pub const EMPTY_DRINK_NAME_MESSAGE: &str = "No drink selected. Please pick a drink.";

/// System prompt for list generation.
pub const LIST_SYSTEM: &str = "You are an expert mixologist who crafts cocktails and \
    mocktails based on the user's stated preference. Keep suggestions concise and bar-ready.";

/// System prompt for detail generation.
pub const DETAIL_SYSTEM: &str = "You are an expert mixologist. Provide precise, bar-ready \
    recipes with clear quantities and concise steps.";

const ALCOHOLIC_STAPLES: &str =
    "common bar staples like ice, citrus (lemon/lime/orange), sugar/simple syrup, and simple garnishes";

const NON_ALCOHOLIC_STAPLES: &str = "common mocktail staples like ice, citrus (lemon/lime/orange), \
    sugar/simple syrup, soda water/club soda/sparkling water, and simple garnishes (no spirits)";

/// List prompt template.
/// Replace: {ingredients}, {drink_label}, {max}, {recipe_label}, {staples}, {restriction}
const LIST_PROMPT_TEMPLATE: &str = r#"Available ingredients: {ingredients}. The user wants {drink_label}. Suggest up to {max} distinct {recipe_label} recipes that a home bartender can make with these ingredients (you may assume access to {staples}).{restriction} Do not introduce any other ingredients.

For each recipe provide a JSON object with name, description (1-2 sentences), instructions (1-3 short steps), and ingredients (array of ingredient names exactly as listed above, without quantities). Return a single JSON object shaped as {"recipes":[{"name":"...","description":"...","instructions":"...","ingredients":["..."]}]} with at most {max} recipes."#;

/// Detail prompt template.
/// Replace: {drink_noun}, {drink_name}, {staples}, {ingredients}, {restriction}
const DETAIL_PROMPT_TEMPLATE: &str = r#"Provide a detailed {drink_noun} recipe for the drink named "{drink_name}".

You must only use ingredients from this list plus {staples}. Do not introduce any other ingredients.
Allowed ingredients: {ingredients}.{restriction}

Return a single JSON object with: name (string), description (1-2 sentences), ingredients (array of strings with quantities), and steps (array of short step-by-step instructions). Shape: {"name":"...","description":"...","ingredients":["..."],"steps":["..."]}."#;

fn staples(preference: Preference) -> &'static str {
    match preference {
        Preference::Alcoholic => ALCOHOLIC_STAPLES,
        Preference::NonAlcoholic => NON_ALCOHOLIC_STAPLES,
    }
}

/// Builds the list-generation prompt.
///
/// Blank entries are dropped; an empty remainder is a validation error and no
/// prompt is produced.
pub fn build_list_prompt(
    ingredients: &[String],
    preference: Preference,
) -> Result<String, RecipeError> {
    let ingredients = clean_ingredients(ingredients);
    if ingredients.is_empty() {
        return Err(RecipeError::Validation(EMPTY_INGREDIENTS_MESSAGE.to_string()));
    }

    let (drink_label, recipe_label, restriction) = match preference {
        Preference::Alcoholic => ("alcoholic drinks", "alcoholic drink", ""),
        Preference::NonAlcoholic => (
            "non-alcoholic drinks",
            "non-alcoholic drink",
            " Ensure every recipe is completely free of alcohol, spirits, and liqueurs.",
        ),
    };

    let max = MAX_RECIPES.to_string();
    let ingredients = ingredients.join(", ");
    Ok(render(
        LIST_PROMPT_TEMPLATE,
        &[
            ("drink_label", drink_label),
            ("recipe_label", recipe_label),
            ("max", max.as_str()),
            ("staples", staples(preference)),
            ("restriction", restriction),
            ("ingredients", ingredients.as_str()),
        ],
    ))
}

/// Builds the detail-generation prompt for a single drink.
pub fn build_detail_prompt(
    drink_name: &str,
    allowed_ingredients: &[String],
    preference: Preference,
) -> Result<String, RecipeError> {
    let drink_name = drink_name.trim();
    if drink_name.is_empty() {
        return Err(RecipeError::Validation(EMPTY_DRINK_NAME_MESSAGE.to_string()));
    }

    let restriction = match preference {
        Preference::Alcoholic => "",
        Preference::NonAlcoholic => {
            " Ensure the recipe is completely free of alcohol, spirits, and liqueurs."
        }
    };

    let ingredients = clean_ingredients(allowed_ingredients).join(", ");
    Ok(render(
        DETAIL_PROMPT_TEMPLATE,
        &[
            ("drink_noun", preference.drink_noun()),
            ("staples", staples(preference)),
            ("restriction", restriction),
            ("ingredients", ingredients.as_str()),
            ("drink_name", drink_name),
        ],
    ))
}

/// Fills `{key}` placeholders in one pass over the template. Substituted
/// values are never rescanned, so user text containing `{...}` stays verbatim.
/// Unknown braces (the JSON shape examples) are copied through.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = values.iter().find(|(key, _)| {
            tail.strip_prefix(*key)
                .is_some_and(|after| after.starts_with('}'))
        });
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

fn clean_ingredients(ingredients: &[String]) -> Vec<&str> {
    ingredients
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .collect()
}
