pub mod access_code;
pub mod toml_config;

pub use access_code::{AuthConfig, ACCESS_CODE_ENV_VAR, ACCESS_CODE_FILE};
pub use toml_config::{LoadConfig, SourceConfig, TravelerInfoConfig};
