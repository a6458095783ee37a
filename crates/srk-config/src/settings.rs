use anyhow::{anyhow, Result};
use serde::Serialize;
use serde_json::Value;

/// Typed view of the restore-related config keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RestoreSettings {
    /// Finalize restored transactions on the queue as they are matched.
    pub finalize_automatically: bool,
    /// Opaque account hint forwarded to the queue when a restore begins.
    pub application_username: Option<String>,
    /// `tracing` env-filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Default for RestoreSettings {
    fn default() -> Self {
        Self {
            finalize_automatically: true,
            application_username: None,
            log_filter: None,
        }
    }
}

impl RestoreSettings {
    /// Build from canonical config JSON (produced by [`crate::load_layered_yaml`]).
    ///
    /// All fields are optional:
    /// - restore.finalize_automatically (bool); default=true
    /// - restore.application_username (non-empty string)
    /// - logging.filter (string)
    pub fn from_config_json(cfg: &Value) -> Result<Self> {
        let finalize_automatically = match cfg.pointer("/restore/finalize_automatically") {
            None | Some(Value::Null) => true,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                return Err(anyhow!(
                    "restore.finalize_automatically must be a bool (got {other})"
                ))
            }
        };

        let application_username = optional_string(cfg, "/restore/application_username")?;
        if application_username.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(anyhow!("restore.application_username must not be blank"));
        }

        let log_filter = optional_string(cfg, "/logging/filter")?;

        Ok(Self {
            finalize_automatically,
            application_username,
            log_filter,
        })
    }
}

fn optional_string(cfg: &Value, pointer: &str) -> Result<Option<String>> {
    match cfg.pointer(pointer) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(anyhow!(
            "{} must be a string (got {other})",
            pointer.trim_start_matches('/').replace('/', ".")
        )),
    }
}
