mod loader;

#[allow(unused_imports)]
pub use loader::{Config, TimingConfig, DEFAULT_STORAGE_KEY};
