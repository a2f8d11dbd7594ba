pub mod loader;
pub mod types;

pub use loader::{LoadedConfig, default_config_path, load, load_with_env, save};
pub use types::BankConfig;
