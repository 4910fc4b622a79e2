//! Constraint Filter: client-side backstop against invented ingredients.
//!
//! A recipe survives only if every ingredient is something the user listed
//! or a staple for the chosen preference. Comparison happens on normalized
//! names so "Rum," and "rum" match. This is advisory, not a security boundary:
//! the prompt already states the same rules.

use tracing::warn;

use crate::generation::prompts::MAX_RECIPES;
use crate::models::recipe::{Preference, RecipeSummary};

/// Substrings that mark an ingredient as an always-available bar staple.
/// Substring matching over-accepts: "ice" also matches "pineapple juice" and
/// "orange" matches "orange liqueur".
const ALCOHOLIC_STAPLE_KEYWORDS: &[&str] = &[
    "ice", "citrus", "lemon", "lime", "orange", "sugar", "syrup", "garnish",
];

/// Extra staples for mocktails: soda and sparkling water.
const SPARKLING_STAPLE_KEYWORDS: &[&str] = &["soda", "sparkling water", "seltzer", "club soda"];

/// Whole words that indicate alcohol in a non-alcoholic recipe.
const SPIRIT_WORDS: &[&str] = &[
    "rum", "vodka", "gin", "tequila", "mezcal", "whiskey", "whisky", "bourbon", "scotch",
    "brandy", "cognac", "liqueur", "schnapps", "vermouth", "absinthe", "wine", "champagne",
    "prosecco", "beer", "sake",
];

/// Word sequences that mark the next word as alcohol-free ("non-alcoholic gin").
/// Only that one word is exempt; the rest of the text is still scanned.
const ALCOHOL_FREE_MARKERS: &[&[&str]] = &[
    &["non", "alcoholic"],
    &["nonalcoholic"],
    &["alcohol", "free"],
    &["alcoholfree"],
    &["zero", "proof"],
    &["zeroproof"],
    &["virgin"],
    &["no", "alcohol"],
    &["without", "alcohol"],
];

/// Soft drinks whose names contain a spirit word.
const SOFT_DRINK_PHRASES: &[&str] = &["ginger beer", "root beer"];

/// Lower-cases, drops everything outside `[a-z0-9 ]`, and collapses whitespace.
pub fn normalize_ingredient(raw: &str) -> String {
    let cleaned: String = raw
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            'a'..='z' | '0'..='9' => Some(c),
            c if c.is_whitespace() => Some(' '),
            _ => None,
        })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn staple_keywords(preference: Preference) -> Vec<&'static str> {
    let mut keywords = ALCOHOLIC_STAPLE_KEYWORDS.to_vec();
    if preference == Preference::NonAlcoholic {
        keywords.extend_from_slice(SPARKLING_STAPLE_KEYWORDS);
    }
    keywords
}

fn is_staple(normalized: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| normalized.contains(k))
}

/// Length of the alcohol-free marker starting at `words[0]`, if any.
fn marker_len(words: &[&str]) -> Option<usize> {
    ALCOHOL_FREE_MARKERS
        .iter()
        .find(|marker| words.starts_with(marker))
        .map(|marker| marker.len())
}

/// True if the text names an alcoholic ingredient as a whole word.
fn mentions_spirit(text: &str) -> bool {
    let mut normalized = normalize_ingredient(text);
    for phrase in SOFT_DRINK_PHRASES {
        normalized = normalized.replace(phrase, " ");
    }

    let words: Vec<&str> = normalized.split_whitespace().collect();
    let mut i = 0;
    while i < words.len() {
        if let Some(len) = marker_len(&words[i..]) {
            // Skip the marker and the word it qualifies.
            i += len + 1;
            continue;
        }
        if SPIRIT_WORDS.contains(&words[i]) {
            return true;
        }
        i += 1;
    }
    false
}

/// Keeps recipes whose ingredients are all user-supplied or staples, capped
/// at `MAX_RECIPES`. Recipes with no ingredients are dropped.
pub fn filter_recipes(
    recipes: Vec<RecipeSummary>,
    user_ingredients: &[String],
    preference: Preference,
) -> Vec<RecipeSummary> {
    let allowed: Vec<String> = user_ingredients
        .iter()
        .map(|i| normalize_ingredient(i))
        .filter(|i| !i.is_empty())
        .collect();
    let keywords = staple_keywords(preference);

    recipes
        .into_iter()
        .filter(|recipe| {
            let keep = satisfies_constraints(recipe, &allowed, &keywords, preference);
            if !keep {
                warn!(
                    "Dropping recipe '{}': ingredients {:?} outside constraints",
                    recipe.name, recipe.ingredients
                );
            }
            keep
        })
        .take(MAX_RECIPES)
        .collect()
}

fn satisfies_constraints(
    recipe: &RecipeSummary,
    allowed: &[String],
    keywords: &[&str],
    preference: Preference,
) -> bool {
    if recipe.ingredients.is_empty() {
        return false;
    }

    let within_pantry = recipe.ingredients.iter().all(|ingredient| {
        let normalized = normalize_ingredient(ingredient);
        allowed.contains(&normalized) || is_staple(&normalized, keywords)
    });
    if !within_pantry {
        return false;
    }

    match preference {
        Preference::Alcoholic => true,
        Preference::NonAlcoholic => {
            !recipe.ingredients.iter().any(|i| mentions_spirit(i))
                && !mentions_spirit(&recipe.instructions)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(name: &str, ingredients: &[&str]) -> RecipeSummary {
        RecipeSummary {
            name: name.to_string(),
            description: String::new(),
            instructions: String::new(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn user(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_strips_case_punctuation_and_spacing() {
        assert_eq!(normalize_ingredient("  Rum,  (Dark)! "), "rum dark");
        assert_eq!(normalize_ingredient("Club\tSoda"), "club soda");
        assert_eq!(normalize_ingredient("7-Up"), "7up");
        assert_eq!(normalize_ingredient("!!!"), "");
    }

    #[test]
    fn test_user_ingredients_match_case_insensitively() {
        let kept = filter_recipes(
            vec![recipe("Neat", &["rum"])],
            &user(&["Rum"]),
            Preference::Alcoholic,
        );
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_unlisted_ingredient_drops_recipe() {
        let kept = filter_recipes(
            vec![recipe("Mixed", &["rum", "vodka"])],
            &user(&["Rum"]),
            Preference::Alcoholic,
        );
        assert!(kept.is_empty());
    }

    #[test]
    fn test_staples_are_exempt() {
        let kept = filter_recipes(
            vec![recipe(
                "Cuba Libre",
                &["Rum", "cola", "Ice", "lime wedge", "simple syrup"],
            )],
            &user(&["rum", "cola"]),
            Preference::Alcoholic,
        );
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_soda_is_a_staple_only_for_mocktails() {
        let recipes = vec![recipe("Lime Rickey", &["lime", "mint", "Club Soda"])];

        let mocktails = filter_recipes(recipes.clone(), &user(&["mint"]), Preference::NonAlcoholic);
        assert_eq!(mocktails.len(), 1);

        let cocktails = filter_recipes(recipes, &user(&["mint"]), Preference::Alcoholic);
        assert!(cocktails.is_empty());
    }

    #[test]
    fn test_mocktail_drops_spirits_even_if_user_listed_them() {
        let mut spiked = recipe("Spiked Lemonade", &["lemonade", "vodka"]);
        spiked.instructions = "Stir together.".to_string();
        let mut sneaky = recipe("Sneaky Fizz", &["lemonade", "soda water"]);
        sneaky.instructions = "Top with a splash of gin.".to_string();

        let kept = filter_recipes(
            vec![spiked, sneaky],
            &user(&["lemonade", "vodka"]),
            Preference::NonAlcoholic,
        );
        assert!(kept.is_empty());
    }

    #[test]
    fn test_alcohol_free_phrases_are_not_spirits() {
        let kept = filter_recipes(
            vec![recipe("Mule Mocktail", &["ginger beer", "lime", "Non-alcoholic gin"])],
            &user(&["ginger beer", "non-alcoholic gin"]),
            Preference::NonAlcoholic,
        );
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn test_alcohol_free_marker_only_exempts_the_word_it_qualifies() {
        let mut spiked = recipe("Ginger Fizz", &["lemonade", "ginger ale"]);
        spiked.instructions =
            "Add a splash of rum, then top with alcohol-free ginger ale.".to_string();
        let mut clean = recipe("Zero Proof Spritz", &["lemonade", "zero-proof gin"]);
        clean.instructions = "Stir the zero-proof gin into lemonade.".to_string();

        let kept = filter_recipes(
            vec![spiked, clean],
            &user(&["lemonade", "ginger ale", "zero-proof gin"]),
            Preference::NonAlcoholic,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "Zero Proof Spritz");
    }

    #[test]
    fn test_saying_no_alcohol_does_not_drop_mocktail() {
        let mut mocktail = recipe("Mint Lemonade", &["lemonade", "mint", "ice"]);
        mocktail.instructions =
            "Muddle mint, add lemonade over ice. No alcohol needed.".to_string();
        let mut spirited = recipe("Garden Cooler", &["lemonade", "mint"]);
        spirited.instructions = "A spirited drink without alcohol of any kind.".to_string();

        let kept = filter_recipes(
            vec![mocktail, spirited],
            &user(&["lemonade", "mint"]),
            Preference::NonAlcoholic,
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_recipe_without_ingredients_is_dropped() {
        let kept = filter_recipes(vec![recipe("Air", &[])], &user(&["rum"]), Preference::Alcoholic);
        assert!(kept.is_empty());
    }

    #[test]
    fn test_result_is_capped_at_five() {
        let recipes = (0..7).map(|i| recipe(&format!("Rum {i}"), &["rum"])).collect();
        let kept = filter_recipes(recipes, &user(&["rum"]), Preference::Alcoholic);
        assert_eq!(kept.len(), 5);
    }
}
