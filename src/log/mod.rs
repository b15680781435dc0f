use tracing_subscriber::{fmt, reload, EnvFilter, Registry};
use tracing_subscriber::prelude::*;

/// Global subscriber with a log level that can be changed while running
pub struct Logger {
    reload_handle: reload::Handle<EnvFilter, Registry>,
    level: String,
}

impl Logger {
    pub fn new(initial_level:&str) -> Self {
        let filter = EnvFilter::new(initial_level);
        let (filter_layer, reload_handle) = reload::Layer::new(filter);

        tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt::layer().with_thread_names(true))
            .init();

        Self { reload_handle, level: initial_level.to_string() }
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn set_log_level(&mut self, level: &str) -> Result<(),String> {
        self.reload_handle
            .modify(|f| *f = EnvFilter::new(level))
            .map_err(|e| format!("Cannot change log level to {}: {}",level,e))?;
        self.level = level.to_string();
        Ok(())
    }
}
