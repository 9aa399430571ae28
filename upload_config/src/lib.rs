pub mod configuration_utils;
pub mod groups;
pub mod macros;
mod uploader_config;

pub use configuration_utils::{EnvVarGuard, ParsableConfigValue, ENV_PREFIX};
pub use uploader_config::UploaderConfig;
