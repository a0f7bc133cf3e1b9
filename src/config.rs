use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::aggregate::BucketPolicy;
use crate::error::ConfigError;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "SILENT_STRUGGLE_CONFIG";

/// The survey export, resolved against the working directory.
pub const DEFAULT_DATASET: &str = "Mental Health Dataset.csv";

/// Knobs for the dashboard. Every field has a default, so a config file
/// only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub dataset_path: PathBuf,
    /// Labels of `Gender` kept as-is; the rest fold into one bucket.
    pub gender_policy: BucketPolicy,
    /// Countries need strictly more respondents than this to be charted.
    pub country_min_count: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            gender_policy: BucketPolicy::default(),
            country_min_count: 20,
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, then the config file if given, then the first positional
    /// argument as the dataset path.
    pub fn resolve<I>(config_file: Option<&Path>, args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = match config_file {
            Some(path) => {
                info!("reading config from {}", path.display());
                DashboardConfig::from_file(path)?
            }
            None => DashboardConfig::default(),
        };
        if let Some(dataset) = args.into_iter().next() {
            config.dataset_path = PathBuf::from(dataset);
        }
        Ok(config)
    }

    /// [`DashboardConfig::resolve`] from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config_file = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        DashboardConfig::resolve(config_file.as_deref(), std::env::args().skip(1))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_the_published_page() {
        let config = DashboardConfig::resolve(None, Vec::new()).unwrap();
        assert_eq!(config.dataset_path, PathBuf::from("Mental Health Dataset.csv"));
        assert_eq!(config.country_min_count, 20);
        assert_eq!(config.gender_policy.keep, vec!["Male", "Female"]);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"gender_policy": {{"keep": ["Female"]}}, "country_min_count": 5}}"#).unwrap();

        let config = DashboardConfig::resolve(Some(file.path()), Vec::new()).unwrap();
        assert_eq!(config.country_min_count, 5);
        assert_eq!(config.gender_policy.keep, vec!["Female"]);
        assert_eq!(config.gender_policy.other_label, "Non-Binary/Other");
        assert_eq!(config.dataset_path, PathBuf::from(DEFAULT_DATASET));
    }

    #[test]
    fn positional_argument_overrides_dataset() {
        let config =
            DashboardConfig::resolve(None, vec!["data/survey.parquet".to_string()]).unwrap();
        assert_eq!(config.dataset_path, PathBuf::from("data/survey.parquet"));
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            DashboardConfig::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            DashboardConfig::from_file(Path::new("/nonexistent/config.json")),
            Err(ConfigError::Read { .. })
        ));
    }
}
