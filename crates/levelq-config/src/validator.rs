//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{Config, SyncMode, MAX_QUEUE_SIZE, MIN_QUEUE_SIZE};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a `ConfigError`.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_queue(config, &mut result);
        Self::validate_logging(config, &mut result);

        Ok(result)
    }

    /// Check a ring size against the supported range.
    pub fn check_max_queue_size(max_queue_size: u64) -> Result<(), ValidationError> {
        if max_queue_size < MIN_QUEUE_SIZE {
            return Err(ValidationError::new(
                "queue.max_queue_size",
                format!("max_queue_size must be at least {}", MIN_QUEUE_SIZE),
            ));
        }
        if max_queue_size > MAX_QUEUE_SIZE {
            return Err(ValidationError::new(
                "queue.max_queue_size",
                format!("max_queue_size must not exceed {}", MAX_QUEUE_SIZE),
            ));
        }
        Ok(())
    }

    fn validate_queue(config: &Config, result: &mut ValidationResult) {
        if let Err(err) = Self::check_max_queue_size(config.queue.max_queue_size) {
            result.add_error(err);
        }

        if config.queue.data_dir.as_os_str().is_empty() {
            result.add_error(ValidationError::new(
                "queue.data_dir",
                "data_dir cannot be empty",
            ));
        }

        if config.queue.sync_mode == SyncMode::Off {
            result.add_warning(ValidationWarning::new(
                "queue.sync_mode",
                "sync_mode is off, entries may be lost on power failure",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        let level = config.logging.level.to_ascii_lowercase();
        if !valid_levels.contains(&level.as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!(
                    "'{}' is not a plain level, it will be parsed as a filter directive",
                    config.logging.level
                ),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
