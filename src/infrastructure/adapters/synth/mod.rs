//! Synth Adapter - 外部声音克隆服务客户端

mod fake_synth_client;
mod http_synth_client;

pub use fake_synth_client::{FakeSynthClient, FakeSynthClientConfig};
pub use http_synth_client::{HttpSynthClient, HttpSynthClientConfig};
