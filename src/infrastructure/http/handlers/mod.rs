//! HTTP Handlers

mod cleanup;
mod health;
mod ping;
mod voice;

pub use cleanup::*;
pub use health::*;
pub use ping::*;
pub use voice::*;
