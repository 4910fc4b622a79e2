//! Cat Bartender: cocktail and mocktail suggestions from the ingredients you have.
//!
//! The library holds the recipe pipelines (prompt → chat completion → decode →
//! constraint filter → observable state). The `bartender-relay` binary serves
//! the development relay that keeps the API key out of the browser.

pub mod config;
pub mod errors;
pub mod generation;
pub mod llm_client;
pub mod models;
pub mod relay;
pub mod routes;
pub mod state;

pub use config::{Config, PipelineConfig};
pub use generation::error::{PipelineKind, RecipeError};
pub use generation::pipeline::{ConstraintMode, DetailPipeline, ListPipeline, Pipeline};
pub use generation::state::{RequestState, StateSnapshot};
pub use llm_client::{ChatTransport, CredentialMode, LlmClient, TransportError};
pub use models::ingredient::IngredientList;
pub use models::recipe::{Preference, RecipeDetail, RecipeSummary};
