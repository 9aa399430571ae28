use crate::groups;

/// All configuration groups, with environment overrides applied by `new()`.
#[derive(Debug, Clone, Default)]
pub struct UploaderConfig {
    pub client: groups::client::ConfigValueGroup,
    pub tracking: groups::tracking::ConfigValueGroup,
    pub log: groups::log::ConfigValueGroup,
}

impl UploaderConfig {
    /// Defaults overridden by any `UPLOADER_*` environment variables.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    pub fn apply_env_overrides(&mut self) {
        self.client.apply_env_overrides();
        self.tracking.apply_env_overrides();
        self.log.apply_env_overrides();
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.client.endpoint = endpoint.into();
        self
    }
}
