//! Command handler modules for srk-cli.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod replay;

use anyhow::Result;
use srk_config::{report_unused_keys, RestoreSettings, UnusedKeyPolicy};

/// Settings resolved for one CLI invocation.
pub struct ResolvedConfig {
    pub settings: RestoreSettings,
    /// `None` when no config layers were given.
    pub config_hash: Option<String>,
}

/// Parse a CLI `--unused-keys` string into an [`UnusedKeyPolicy`].
pub fn parse_unused_key_policy(s: &str) -> Result<UnusedKeyPolicy> {
    match s.trim().to_uppercase().as_str() {
        "WARN" => Ok(UnusedKeyPolicy::Warn),
        "FAIL" => Ok(UnusedKeyPolicy::Fail),
        other => anyhow::bail!("invalid --unused-keys '{}'. expected one of: WARN | FAIL", other),
    }
}

/// Load layered config (if any) and resolve typed restore settings.
pub fn load_config(paths: &[String], policy: UnusedKeyPolicy) -> Result<ResolvedConfig> {
    if paths.is_empty() {
        return Ok(ResolvedConfig {
            settings: RestoreSettings::default(),
            config_hash: None,
        });
    }

    let loaded = srk_config::load_layered_yaml(paths)?;
    let report = report_unused_keys(&loaded.config_json, policy)?;
    if !report.is_clean() {
        eprintln!(
            "WARN: CONFIG_UNUSED_KEYS unused_leaf_keys={}",
            report.unused_leaf_pointers.len()
        );
        for p in report.unused_leaf_pointers.iter().take(50) {
            eprintln!("  unused={}", p);
        }
    }

    Ok(ResolvedConfig {
        settings: RestoreSettings::from_config_json(&loaded.config_json)?,
        config_hash: Some(loaded.config_hash),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parse_is_case_insensitive() {
        assert_eq!(parse_unused_key_policy("warn").unwrap(), UnusedKeyPolicy::Warn);
        assert_eq!(parse_unused_key_policy(" Fail ").unwrap(), UnusedKeyPolicy::Fail);
        assert!(parse_unused_key_policy("ignore").is_err());
    }

    #[test]
    fn no_config_paths_means_defaults() {
        let r = load_config(&[], UnusedKeyPolicy::Fail).unwrap();
        assert_eq!(r.settings, RestoreSettings::default());
        assert!(r.config_hash.is_none());
    }
}
