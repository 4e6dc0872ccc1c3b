pub mod defaults;
pub mod loader;
pub mod types;

pub use defaults::{DEFAULT_CONCURRENCY, DEFAULT_REGIONS};
pub use loader::ConfigLoader;
pub use types::*;
