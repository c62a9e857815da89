//! Logger initialisation.

use log::LevelFilter;

/// Environment variable that overrides the configured filter.
pub const LOG_ENV_VAR: &str = "RUST_LOG";

/// Install `env_logger` with `default_level` unless `RUST_LOG` says otherwise.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(default_level: LevelFilter) {
    let env = env_logger::Env::default()
        .filter_or(LOG_ENV_VAR, default_level.as_str().to_ascii_lowercase());
    if env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init()
        .is_err()
    {
        log::debug!("Logger already initialised");
    }
}
