//! Configuration: env var keys, typed loaders, domain-grouped schemas.

pub mod env_keys;
pub mod loader;
pub mod schema;

pub use loader::load_dotenv;
pub use schema::{EnvConfig, ObservabilityConfig, ServerConfig};
