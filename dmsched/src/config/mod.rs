//! Run configuration loading.
//!
//! Every key is optional; an absent file, or an empty one, means defaults.
//! The expected YAML structure is:
//! ```yaml
//! # ticks per input time unit; omit for automatic exact scaling
//! resolution: 1000
//! # upper bound on the simulation horizon, in input time units; omit for none
//! max_hyperperiod: 3600
//! # upper bound on job releases per run
//! max_releases: 50000000
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::scheduler::{AnalysisLimits, DEFAULT_MAX_RELEASES};
use crate::time::Resolution;

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Settings for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Ticks per input time unit.  `None` selects the resolution from the
    /// task file itself.
    pub resolution: Option<u64>,

    /// Maximum simulation horizon, in input time units.  `None` leaves the
    /// horizon unbounded; `max_releases` still caps the work.
    pub max_hyperperiod: Option<u64>,

    /// Maximum number of job releases one run may simulate.
    pub max_releases: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            resolution: None,
            max_hyperperiod: None,
            max_releases: DEFAULT_MAX_RELEASES,
        }
    }
}

impl SimConfig {
    /// Parses and validates the YAML file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, if the YAML is
    /// structurally invalid or names an unknown key, or if a value fails
    /// [`validate`](Self::validate).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading run configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        // serde_yaml rejects an empty document for a struct
        let config: SimConfig = if content.trim().is_empty() {
            SimConfig::default()
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?
        };

        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        debug!(
            resolution = ?config.resolution,
            max_hyperperiod = ?config.max_hyperperiod,
            max_releases = config.max_releases,
            "Loaded run configuration"
        );
        Ok(config)
    }

    /// Checks that every configured value is positive.
    pub fn validate(&self) -> Result<()> {
        if self.resolution == Some(0) {
            bail!("resolution must be a positive number of ticks per unit");
        }
        if self.max_hyperperiod == Some(0) {
            bail!("max_hyperperiod must be positive");
        }
        if self.max_releases == 0 {
            bail!("max_releases must be positive");
        }
        Ok(())
    }

    /// The fixed resolution, or `None` for automatic scaling.
    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution.and_then(Resolution::new)
    }

    pub fn limits(&self) -> AnalysisLimits {
        AnalysisLimits {
            max_horizon_units: self.max_hyperperiod,
            max_releases: self.max_releases,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper: write a YAML string to a temp file and return it.
    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn defaults() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.resolution(), None);
        assert_eq!(cfg.limits(), AnalysisLimits::default());
    }

    #[test]
    fn load_full_yaml() {
        let yaml = r#"
resolution: 1000
max_hyperperiod: 60
max_releases: 1000
"#;
        let f = yaml_tempfile(yaml);
        let cfg = SimConfig::load_from_file(f.path()).unwrap();

        assert_eq!(cfg.resolution(), Resolution::new(1_000));
        assert_eq!(
            cfg.limits(),
            AnalysisLimits {
                max_horizon_units: Some(60),
                max_releases: 1_000,
            }
        );
    }

    #[test]
    fn absent_keys_use_defaults() {
        let f = yaml_tempfile("max_releases: 10\n");
        let cfg = SimConfig::load_from_file(f.path()).unwrap();

        assert_eq!(cfg.resolution, None);
        assert_eq!(cfg.max_hyperperiod, None);
        assert_eq!(cfg.max_releases, 10);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let f = yaml_tempfile("\n");
        assert_eq!(SimConfig::load_from_file(f.path()).unwrap(), SimConfig::default());
    }

    #[test]
    fn zero_values_are_rejected() {
        for yaml in ["resolution: 0\n", "max_hyperperiod: 0\n", "max_releases: 0\n"] {
            let f = yaml_tempfile(yaml);
            assert!(SimConfig::load_from_file(f.path()).is_err(), "{yaml}");
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        let f = yaml_tempfile("resolutoin: 1000\n");
        assert!(SimConfig::load_from_file(f.path()).is_err());
    }

    #[test]
    fn missing_file_returns_error() {
        let result = SimConfig::load_from_file(Path::new("/nonexistent/path/config.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = yaml_tempfile("this is: not: valid: yaml: content:::");
        assert!(SimConfig::load_from_file(f.path()).is_err());
    }
}
