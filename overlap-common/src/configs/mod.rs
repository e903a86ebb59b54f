use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{self, Path, PathBuf};
use thiserror::Error;

const SETTINGS_FILE: &str = "settings.json";

/// Errors raised while reading or writing the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to access settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("unable to parse settings file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// A structure to hold run settings. Backed by settings.json file in the current directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Configs {
    pub verbose_mode: bool,
    pub working_directory: String,
    /// Number of scoring threads; -1 uses every available core.
    pub max_procs: isize,
    /// Pairs are reported only when their similarity is strictly greater than this.
    pub similarity_threshold: f64,
    /// When false, every valid boundary is checked regardless of its check flag.
    pub enforce_check_flag: bool,
    /// When true, parcels sharing a byte-identical boundary are reported against each other.
    pub report_duplicate_boundaries: bool,
    pub input_file: String,
    pub output_file: String,
    pub error_file: String,
    /// Field separator of the input file.
    pub delimiter: char,
}

impl Default for Configs {
    fn default() -> Configs {
        Configs {
            verbose_mode: false,
            working_directory: String::new(),
            max_procs: -1,
            similarity_threshold: 0.05,
            enforce_check_flag: false,
            report_duplicate_boundaries: false,
            input_file: "ops_ready_boundaries.tsv".to_string(),
            output_file: "overlaps.txt".to_string(),
            error_file: "errors.txt".to_string(),
            delimiter: '\t',
        }
    }
}

impl Configs {
    pub fn new() -> Configs {
        Configs::default()
    }

    /// Checks that the settings describe a runnable batch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.similarity_threshold >= 0f64 && self.similarity_threshold < 1f64) {
            return Err(ConfigError::Invalid(format!(
                "similarity_threshold must lie in [0, 1), found {}",
                self.similarity_threshold
            )));
        }
        if self.max_procs == 0 || self.max_procs < -1 {
            return Err(ConfigError::Invalid(format!(
                "max_procs must be -1 or a positive thread count, found {}",
                self.max_procs
            )));
        }
        if !self.delimiter.is_ascii() {
            return Err(ConfigError::Invalid(format!(
                "delimiter must be a single ASCII character, found {:?}",
                self.delimiter
            )));
        }
        Ok(())
    }

    /// Resolves a file name against the working directory. Names that already
    /// contain a path separator are returned unchanged.
    pub fn resolve_path(&self, file_name: &str) -> PathBuf {
        if file_name.contains(path::MAIN_SEPARATOR)
            || file_name.contains('/')
            || self.working_directory.is_empty()
        {
            PathBuf::from(file_name)
        } else {
            Path::new(&self.working_directory).join(file_name)
        }
    }

    /// The number of worker threads this run should use.
    pub fn num_threads(&self, available: usize) -> usize {
        if self.max_procs > 0 {
            (self.max_procs as usize).min(available.max(1))
        } else {
            available.max(1)
        }
    }
}

fn settings_path() -> Result<PathBuf, ConfigError> {
    let dir = std::env::current_dir().map_err(|e| ConfigError::Io {
        path: ".".to_string(),
        source: e,
    })?;
    Ok(dir.join(SETTINGS_FILE))
}

/// Reads the settings file in the current directory, falling back to the
/// defaults when no file exists.
pub fn get_configs() -> Result<Configs, ConfigError> {
    get_configs_from(&settings_path()?)
}

pub fn get_configs_from(config_file: &Path) -> Result<Configs, ConfigError> {
    let configs = match fs::read_to_string(config_file) {
        Ok(contents) => serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: config_file.display().to_string(),
            source: e,
        })?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!(
                "No settings file at {}; using default settings",
                config_file.display()
            );
            Configs::new()
        }
        Err(e) => {
            return Err(ConfigError::Io {
                path: config_file.display().to_string(),
                source: e,
            })
        }
    };
    Ok(configs)
}

pub fn save_configs(configs: &Configs) -> Result<(), ConfigError> {
    save_configs_to(configs, &settings_path()?)
}

pub fn save_configs_to(configs: &Configs, config_file: &Path) -> Result<(), ConfigError> {
    let configs_json = serde_json::to_string_pretty(configs).map_err(|e| ConfigError::Parse {
        path: config_file.display().to_string(),
        source: e,
    })?;
    fs::write(config_file, configs_json).map_err(|e| ConfigError::Io {
        path: config_file.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let configs = get_configs_from(&dir.path().join("settings.json")).unwrap();
        assert_eq!(configs, Configs::default());
        assert_eq!(configs.similarity_threshold, 0.05);
        assert!(!configs.enforce_check_flag);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("settings.json");
        fs::write(&file, r#"{ "similarity_threshold": 0.2, "max_procs": 2 }"#).unwrap();
        let configs = get_configs_from(&file).unwrap();
        assert_eq!(configs.similarity_threshold, 0.2);
        assert_eq!(configs.max_procs, 2);
        assert_eq!(configs.output_file, "overlaps.txt");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("settings.json");
        let mut configs = Configs::new();
        configs.verbose_mode = true;
        configs.delimiter = ',';
        save_configs_to(&configs, &file).unwrap();
        assert_eq!(get_configs_from(&file).unwrap(), configs);
    }

    #[test]
    fn test_unparsable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("settings.json");
        fs::write(&file, "{ not json").unwrap();
        assert!(matches!(
            get_configs_from(&file),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_validate() {
        let mut configs = Configs::new();
        assert!(configs.validate().is_ok());
        configs.similarity_threshold = 1.0;
        assert!(configs.validate().is_err());
        configs.similarity_threshold = f64::NAN;
        assert!(configs.validate().is_err());
        configs.similarity_threshold = 0.0;
        configs.max_procs = 0;
        assert!(configs.validate().is_err());
    }

    #[test]
    fn test_resolve_path_and_threads() {
        let mut configs = Configs::new();
        configs.working_directory = "data".to_string();
        assert_eq!(configs.resolve_path("in.tsv"), Path::new("data").join("in.tsv"));
        assert_eq!(configs.resolve_path("/tmp/in.tsv"), PathBuf::from("/tmp/in.tsv"));
        assert_eq!(configs.num_threads(8), 8);
        configs.max_procs = 2;
        assert_eq!(configs.num_threads(8), 2);
        configs.max_procs = 16;
        assert_eq!(configs.num_threads(4), 4);
    }
}
