//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 说话人到参考音频的映射（VoiceCatalog）
//! - 参考音频来源描述

mod catalog;
mod errors;
mod value_objects;

pub use catalog::VoiceCatalog;
pub use errors::CatalogError;
pub use value_objects::{SourceKind, VoiceSpec, DEFAULT_VOICE, MAX_PITCH_SHIFT};
