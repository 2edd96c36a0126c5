//! Wire types: the relay's HTTP bodies and the upstream OpenAI-compatible API

mod openai;
mod relay;

pub use openai::*;
pub use relay::*;
