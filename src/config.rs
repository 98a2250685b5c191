use crate::triage::DEFAULT_CONFIDENCE_THRESHOLD;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_DEMO_MIN_CASES: usize = 6;

#[derive(Debug, Clone, Default, Deserialize)]
struct SetupConfigOverrides {
    #[serde(default)]
    confidence_threshold: Option<f64>,
    #[serde(default)]
    seed_signals_path: Option<String>,
    #[serde(default)]
    demo_min_cases: Option<usize>,
    #[serde(default)]
    seed_on_start: Option<bool>,
    #[serde(default)]
    cors_origins: Option<Vec<String>>,
}

fn load_setup_config_overrides(path: &Path) -> Option<SetupConfigOverrides> {
    if !path.exists() {
        return None;
    }
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "failed to read setup config; using env defaults"
            );
            return None;
        }
    };
    match serde_json::from_str(&contents) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "failed to parse setup config; using env defaults"
            );
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Certainty cases below this confidence are routed to field verification.
    pub confidence_threshold: f64,
    /// Replaces the embedded demo signals when set.
    pub seed_signals_path: Option<PathBuf>,
    pub demo_min_cases: usize,
    pub seed_on_start: bool,
    pub cors_origins: Vec<String>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            seed_signals_path: None,
            demo_min_cases: DEFAULT_DEMO_MIN_CASES,
            seed_on_start: true,
            cors_origins: Vec::new(),
        }
    }
}

impl TriageConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from a key lookup. Setup-file values only fill keys the
    /// lookup leaves unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let overrides = env("GRIDOPS_SETUP_CONFIG_PATH")
            .map(PathBuf::from)
            .and_then(|path| load_setup_config_overrides(&path))
            .unwrap_or_default();
        let defaults = Self::default();

        let confidence_threshold = match env("GRIDOPS_CONFIDENCE_THRESHOLD") {
            Some(value) => value
                .parse::<f64>()
                .with_context(|| format!("GRIDOPS_CONFIDENCE_THRESHOLD is not a number: {value}"))?,
            None => overrides
                .confidence_threshold
                .unwrap_or(defaults.confidence_threshold),
        };
        if !confidence_threshold.is_finite() {
            anyhow::bail!("GRIDOPS_CONFIDENCE_THRESHOLD must be finite");
        }
        let confidence_threshold = confidence_threshold.clamp(0.0, 1.0);

        let seed_signals_path = env("GRIDOPS_SEED_SIGNALS_PATH")
            .or_else(|| {
                overrides
                    .seed_signals_path
                    .as_deref()
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            })
            .map(PathBuf::from);

        let demo_min_cases = env("GRIDOPS_DEMO_MIN_CASES")
            .and_then(|value| value.parse::<usize>().ok())
            .or(overrides.demo_min_cases)
            .unwrap_or(defaults.demo_min_cases);

        let seed_on_start = env("GRIDOPS_SEED_ON_START")
            .and_then(|value| parse_bool(&value))
            .or(overrides.seed_on_start)
            .unwrap_or(defaults.seed_on_start);

        let cors_origins = match env("GRIDOPS_CORS_ORIGINS") {
            Some(value) => value
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
            None => overrides.cors_origins.unwrap_or_default(),
        };

        Ok(Self {
            confidence_threshold,
            seed_signals_path,
            demo_min_cases,
            seed_on_start,
            cors_origins,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn resolve(vars: &[(&str, &str)]) -> Result<TriageConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        TriageConfig::from_lookup(move |key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_env() {
        let config = resolve(&[]).unwrap();
        assert_eq!(config.confidence_threshold, 0.65);
        assert_eq!(config.demo_min_cases, 6);
        assert!(config.seed_on_start);
        assert!(config.seed_signals_path.is_none());
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn env_values_are_parsed_and_clamped() {
        let config = resolve(&[
            ("GRIDOPS_CONFIDENCE_THRESHOLD", " 1.7 "),
            ("GRIDOPS_DEMO_MIN_CASES", "3"),
            ("GRIDOPS_SEED_ON_START", "no"),
            ("GRIDOPS_CORS_ORIGINS", "http://localhost:3000, ,http://127.0.0.1:3000"),
            ("GRIDOPS_SEED_SIGNALS_PATH", "/tmp/signals.json"),
        ])
        .unwrap();

        assert_eq!(config.confidence_threshold, 1.0);
        assert_eq!(config.demo_min_cases, 3);
        assert!(!config.seed_on_start);
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
        assert_eq!(config.seed_signals_path, Some(PathBuf::from("/tmp/signals.json")));
    }

    #[test]
    fn invalid_threshold_is_an_error() {
        assert!(resolve(&[("GRIDOPS_CONFIDENCE_THRESHOLD", "high")]).is_err());
        assert!(resolve(&[("GRIDOPS_CONFIDENCE_THRESHOLD", "NaN")]).is_err());
    }

    #[test]
    fn setup_file_fills_unset_keys_only() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"confidence_threshold": 0.8, "demo_min_cases": 10, "seed_on_start": false}}"#
        )
        .unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config = resolve(&[
            ("GRIDOPS_SETUP_CONFIG_PATH", path.as_str()),
            ("GRIDOPS_DEMO_MIN_CASES", "2"),
        ])
        .unwrap();

        assert_eq!(config.confidence_threshold, 0.8);
        assert_eq!(config.demo_min_cases, 2);
        assert!(!config.seed_on_start);
    }

    #[test]
    fn unreadable_setup_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config = resolve(&[("GRIDOPS_SETUP_CONFIG_PATH", path.as_str())]).unwrap();
        assert_eq!(config.confidence_threshold, 0.65);

        let config = resolve(&[("GRIDOPS_SETUP_CONFIG_PATH", "/nonexistent/gridops.json")]).unwrap();
        assert_eq!(config.demo_min_cases, 6);
    }
}
