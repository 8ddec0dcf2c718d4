use fyndy_core::config::{AppConfig, ConfigError, LoadOptions};
use thiserror::Error;
use tracing::info;

use crate::app::AppState;

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Runs before logging is initialised; the caller reports failures.
pub fn load_config(options: LoadOptions) -> Result<AppConfig, BootstrapError> {
    Ok(AppConfig::load(options)?)
}

pub fn bootstrap_with_config(config: AppConfig) -> Application {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        bind_address = %config.bind_target(),
        access_control = if config.access.is_enforced() { "api_key" } else { "open" },
        "starting application bootstrap"
    );

    let state = AppState::new(config.access.clone(), config.server.port);
    Application { config, state }
}

#[cfg(test)]
mod tests {
    use fyndy_core::config::{ConfigOverrides, LoadOptions};

    use crate::bootstrap::{bootstrap_with_config, load_config, BootstrapError};

    #[test]
    fn load_config_fails_fast_on_invalid_log_level() {
        let result = load_config(LoadOptions {
            overrides: ConfigOverrides {
                log_level: Some("verbose".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        let error = result.err().expect("invalid log level should fail");
        assert!(matches!(error, BootstrapError::Config(_)));
        let message = error.to_string();
        assert!(message.contains("logging.level"));
    }

    #[test]
    fn bootstrap_carries_access_key_into_state() {
        let config = load_config(LoadOptions {
            overrides: ConfigOverrides {
                port: Some(4321),
                api_key: Some("k-boot".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("config should load with valid overrides");
        let app = bootstrap_with_config(config);

        assert_eq!(app.state.port, 4321);
        assert!(app.state.access.is_enforced());
        assert!(app.state.access.accepts([Some("k-boot")]));
        assert!(app.state.engine.decide("Grohe S240").is_ok());
    }
}
