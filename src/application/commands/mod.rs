//! Commands - CQRS 命令定义

mod generate_commands;
mod retention_commands;

pub mod handlers;

pub use generate_commands::{GenerateSpeech, GeneratedArtifact};
pub use retention_commands::SweepArtifacts;
