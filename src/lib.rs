pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod relay;
pub mod runtime;
pub mod telemetry;

pub use config::Config;
pub use error::{RelayError, RelayResult};
pub use relay::Relay;
