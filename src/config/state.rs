// Application state module
// Shared, read-only runtime state handed to every connection

use std::sync::atomic::AtomicBool;

use minijinja::Environment;

use super::types::Config;

/// Application state
///
/// Built once at startup and shared behind an `Arc`. Requests never mutate
/// it, so no locking is needed on the hot path.
pub struct AppState {
    pub config: Config,
    /// Template engine with views loaded from the configured views directory
    pub templates: Environment<'static>,

    // Cached config value for lock-free access on the hot path
    pub cached_access_log: AtomicBool,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let mut templates = Environment::new();
        templates.set_loader(minijinja::path_loader(&config.site.views_dir));

        let cached_access_log = AtomicBool::new(config.logging.access_log);

        Self {
            config,
            templates,
            cached_access_log,
        }
    }
}
