// Recipe generation: prompt building, decoding, constraint filtering and
// the stateful pipelines that tie them to a chat transport.
// All completion calls go through llm_client; no direct HTTP here.

pub mod constraints;
pub mod decoder;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod state;
