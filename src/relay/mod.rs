//! HTTP relay: accepts `/ask` and `/chat` and forwards them upstream

mod error;
mod handler;
mod server;

pub use error::RelayError;
pub use handler::{RelayHandler, MISSING_MESSAGE, MISSING_QUESTION};
pub use server::{build_router, run_server, RelayState};
