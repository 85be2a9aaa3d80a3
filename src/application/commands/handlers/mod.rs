//! Command Handlers

mod generate_handlers;
mod retention_handlers;

pub use generate_handlers::{GenerateSpeechHandler, GenerationSettings};
pub use retention_handlers::SweepArtifactsHandler;
