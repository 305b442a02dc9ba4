pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod generator;
pub mod llm;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use errors::{PipelineError, ValidationError};
pub use generator::context::GeneratorContext;
pub use generator::workflow::{generate, launch};
pub use types::deck::CompletePitchDeck;
pub use types::profile::GenerationRequest;
