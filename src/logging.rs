//! Logging side channel
//!
//! Registry anomalies never abort a rebuild; they are reported here instead,
//! each severity behind its own settings switch.

use crate::settings::RegistrySettings;
use std::fmt;

const TARGET: &str = "referenceables";

/// Severity switches taken from [`RegistrySettings`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogGate {
    pub info: bool,
    pub warnings: bool,
    pub errors: bool,
}

impl LogGate {
    pub fn from_settings(settings: &RegistrySettings) -> Self {
        Self {
            info: settings.log_messages,
            warnings: settings.log_warnings,
            errors: settings.log_errors,
        }
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        if self.info {
            log::info!(target: TARGET, "{}", args);
        }
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        if self.warnings {
            log::warn!(target: TARGET, "{}", args);
        }
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        if self.errors {
            log::error!(target: TARGET, "{}", args);
        }
    }
}

impl Default for LogGate {
    fn default() -> Self {
        Self::from_settings(&RegistrySettings::default())
    }
}

/// Install `env_logger`, honouring `RUST_LOG` and defaulting to `info`
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
