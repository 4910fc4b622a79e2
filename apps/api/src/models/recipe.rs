use serde::{Deserialize, Serialize};

/// Alcoholic / non-alcoholic toggle. Drives prompt wording, the staple
/// vocabulary and the constraint filter keyword set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    #[default]
    Alcoholic,
    NonAlcoholic,
}

impl Preference {
    pub fn is_alcoholic(self) -> bool {
        matches!(self, Preference::Alcoholic)
    }

    /// "cocktail" or "mocktail".
    pub fn drink_noun(self) -> &'static str {
        match self {
            Preference::Alcoholic => "cocktail",
            Preference::NonAlcoholic => "mocktail",
        }
    }
}

/// A short recipe produced by the list pipeline. `name` is never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub name: String,
    pub description: String,
    pub instructions: String,
    pub ingredients: Vec<String>,
}

/// A detailed recipe produced by the detail pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub name: String,
    pub description: String,
    /// Ingredients with quantities, e.g. "2 oz white rum".
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}
