use std::path::Path;

use crate::{
    infra::{self, config::FileConfigAdapter, contracts::ConfigAdapter, error::AppError},
    usecases::context::AppContext,
};

pub fn bootstrap(config_path: Option<&Path>) -> Result<AppContext, AppError> {
    let config_adapter = FileConfigAdapter::new(config_path);
    let config = config_adapter.load().map_err(AppError::Other)?;
    let log_guard = infra::logging::init(&config.logging)?;

    Ok(AppContext::new(config, log_guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::config::AppConfig;

    #[test]
    fn builds_context_with_default_config_when_file_is_missing() {
        // Logging may already be initialized by another test; only the
        // config half of bootstrap is asserted here.
        let config_adapter = FileConfigAdapter::new(Some(Path::new("./missing-config.toml")));
        let config = config_adapter.load().expect("config should load");

        assert_eq!(config, AppConfig::default());
    }
}
