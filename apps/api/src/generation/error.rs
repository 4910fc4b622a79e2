use thiserror::Error;

use crate::llm_client::TransportError;

/// Which pipeline produced an error. Only affects user-facing wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    List,
    Detail,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    /// The completion text was not valid JSON. Parser details are logged, not kept.
    #[error("unparseable")]
    Unparseable,
}

/// Everything that can end a generation attempt.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("model returned no usable recipes")]
    NoRecipes,

    #[error("all recipes were rejected by the ingredient constraints")]
    Constraint,
}

impl RecipeError {
    /// The single message stored in `RequestState::Failed`.
    ///
    /// Decoder and HTTP-client internals never reach this string.
    pub fn user_message(&self, kind: PipelineKind) -> String {
        match self {
            RecipeError::Validation(msg) => msg.clone(),
            RecipeError::Transport(TransportError::MissingCredential) => {
                "Missing OpenAI API key. Set BARTENDER_API_KEY in .env.local.".to_string()
            }
            RecipeError::Transport(TransportError::Api { message, .. }) => message.clone(),
            RecipeError::Transport(TransportError::Http(_)) => {
                "Could not reach the recipe service. Please try again.".to_string()
            }
            RecipeError::Transport(TransportError::Parse(_) | TransportError::EmptyContent) => {
                match kind {
                    PipelineKind::List => "No recipes returned. Please try again.",
                    PipelineKind::Detail => "No details returned. Please try again.",
                }
                .to_string()
            }
            RecipeError::Decode(DecodeError::Unparseable) => match kind {
                PipelineKind::List => "Could not understand the recipe response. Please try again.",
                PipelineKind::Detail => "Could not parse the recipe details. Try again.",
            }
            .to_string(),
            RecipeError::NoRecipes => {
                "No recipes generated. Try different ingredients.".to_string()
            }
            RecipeError::Constraint => {
                "No recipes matched your ingredients. Try adding more ingredients.".to_string()
            }
        }
    }
}
