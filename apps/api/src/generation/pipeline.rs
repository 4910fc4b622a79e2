//! Recipe pipeline: one configurable pipeline for both list and detail generation.
//!
//! Flow: build prompt → transport → decode → constraint filter (list only) →
//!       request state update.
//!
//! Validation failures never reach the transport: the state goes straight
//! to `Failed`.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::generation::constraints::filter_recipes;
use crate::generation::decoder::{decode_detail, decode_list};
use crate::generation::error::{PipelineKind, RecipeError};
use crate::generation::prompts::{
    build_detail_prompt, build_list_prompt, DETAIL_SYSTEM, LIST_SYSTEM,
};
use crate::generation::state::{RequestState, StateMachine, StateSnapshot};
use crate::llm_client::{ChatTransport, LlmClient};
use crate::models::recipe::{Preference, RecipeDetail, RecipeSummary};

/// Whether the list pipeline drops recipes that use unlisted ingredients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConstraintMode {
    #[default]
    Enforce,
    Off,
}

// ────────────────────────────────────────────────────────────────────────────
// Stateless stages
// ────────────────────────────────────────────────────────────────────────────

/// Runs list generation once, without touching any request state.
pub async fn generate_recipes(
    transport: &dyn ChatTransport,
    ingredients: &[String],
    preference: Preference,
    constraints: ConstraintMode,
) -> Result<Vec<RecipeSummary>, RecipeError> {
    let prompt = build_list_prompt(ingredients, preference)?;
    request_recipes(transport, &prompt, ingredients, preference, constraints).await
}

/// Runs detail generation once, without touching any request state.
pub async fn generate_details(
    transport: &dyn ChatTransport,
    drink_name: &str,
    allowed_ingredients: &[String],
    preference: Preference,
) -> Result<RecipeDetail, RecipeError> {
    let prompt = build_detail_prompt(drink_name, allowed_ingredients, preference)?;
    request_details(transport, &prompt, drink_name).await
}

async fn request_recipes(
    transport: &dyn ChatTransport,
    prompt: &str,
    ingredients: &[String],
    preference: Preference,
    constraints: ConstraintMode,
) -> Result<Vec<RecipeSummary>, RecipeError> {
    let raw = transport.complete(LIST_SYSTEM, prompt).await?;

    let recipes = decode_list(&raw)?;
    if recipes.is_empty() {
        return Err(RecipeError::NoRecipes);
    }
    let decoded = recipes.len();

    let recipes = match constraints {
        ConstraintMode::Enforce => filter_recipes(recipes, ingredients, preference),
        ConstraintMode::Off => recipes,
    };
    if recipes.is_empty() {
        return Err(RecipeError::Constraint);
    }

    info!(
        "Generated {} recipes ({} decoded) for {:?}",
        recipes.len(),
        decoded,
        preference
    );
    Ok(recipes)
}

async fn request_details(
    transport: &dyn ChatTransport,
    prompt: &str,
    drink_name: &str,
) -> Result<RecipeDetail, RecipeError> {
    let raw = transport.complete(DETAIL_SYSTEM, prompt).await?;
    let detail = decode_detail(&raw, drink_name.trim())?;

    info!(
        "Generated details for '{}': {} ingredients, {} steps",
        detail.name,
        detail.ingredients.len(),
        detail.steps.len()
    );
    Ok(detail)
}

// ────────────────────────────────────────────────────────────────────────────
// Stateful pipeline
// ────────────────────────────────────────────────────────────────────────────

/// A pipeline instance with observable request state.
///
/// Instances share nothing but the (read-only) transport. Overlapping calls on
/// one instance are allowed; only the most recently started one lands.
pub struct Pipeline<T> {
    transport: Arc<dyn ChatTransport>,
    state: StateMachine<T>,
    constraints: ConstraintMode,
}

pub type ListPipeline = Pipeline<Vec<RecipeSummary>>;
pub type DetailPipeline = Pipeline<RecipeDetail>;

impl<T: Clone> Pipeline<T> {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self {
            transport,
            state: StateMachine::new(),
            constraints: ConstraintMode::default(),
        }
    }

    /// Builds a pipeline backed by the production `LlmClient`.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(Arc::new(LlmClient::new(config)))
    }

    pub fn state(&self) -> RequestState<T> {
        self.state.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<StateSnapshot<T>> {
        self.state.subscribe()
    }

    /// Drops a `Failed` message, e.g. when the user edits their ingredients.
    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    fn reject(&self, kind: PipelineKind, err: RecipeError) {
        warn!("{:?} generation rejected before request: {err}", kind);
        self.state.reject(err.user_message(kind));
    }
}

impl ListPipeline {
    pub fn with_constraints(mut self, constraints: ConstraintMode) -> Self {
        self.constraints = constraints;
        self
    }

    /// Generates up to five recipes. The outcome is published to the state.
    pub async fn generate_list(&self, ingredients: &[String], preference: Preference) {
        let prompt = match build_list_prompt(ingredients, preference) {
            Ok(prompt) => prompt,
            Err(err) => return self.reject(PipelineKind::List, err),
        };

        let ticket = self.state.begin();
        info!(
            "Requesting recipes for {} ingredients (generation {}, {:?} credentials)",
            ingredients.len(),
            ticket.generation(),
            self.transport.credential_mode()
        );

        let outcome = request_recipes(
            self.transport.as_ref(),
            &prompt,
            ingredients,
            preference,
            self.constraints,
        )
        .await
        .map_err(|err| {
            warn!("Recipe generation failed: {err}");
            err.user_message(PipelineKind::List)
        });

        self.state.finish(ticket, outcome);
    }
}

impl DetailPipeline {
    /// Generates the detailed recipe for one drink.
    pub async fn generate_detail(
        &self,
        drink_name: &str,
        allowed_ingredients: &[String],
        preference: Preference,
    ) {
        let prompt = match build_detail_prompt(drink_name, allowed_ingredients, preference) {
            Ok(prompt) => prompt,
            Err(err) => return self.reject(PipelineKind::Detail, err),
        };

        let ticket = self.state.begin();
        info!(
            "Requesting details for '{}' (generation {})",
            drink_name.trim(),
            ticket.generation()
        );

        let outcome = request_details(self.transport.as_ref(), &prompt, drink_name)
            .await
            .map_err(|err| {
                warn!("Detail generation failed: {err}");
                err.user_message(PipelineKind::Detail)
            });

        self.state.finish(ticket, outcome);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
