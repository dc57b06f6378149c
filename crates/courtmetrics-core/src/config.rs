// Configuration loading and parsing (courtmetrics.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analysis::minutes::MinutesRounding;
use crate::analysis::trend::TrendSettings;
use crate::table::ColumnCase;

/// File name shared by `defaults/` and `config/`.
pub const CONFIG_FILE_NAME: &str = "courtmetrics.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

/// The whole courtmetrics.toml file. Every section is optional and falls
/// back to the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub cache: CacheConfig,
    pub analysis: AnalysisConfig,
    pub dashboard: DashboardConfig,
    pub console: ConsoleConfig,
    pub teams: TeamsConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub column_case: ColumnCase,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: "https://stats.nba.com/stats".into(),
            timeout_secs: 30,
            max_attempts: 3,
            retry_delay_ms: 1000,
            column_case: ColumnCase::Lower,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum cached responses; 0 disables eviction.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig { capacity: 512 }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub lookback_days: u32,
    pub last_n: usize,
    pub role_decrease_tolerance: f64,
    pub role_expansion_tolerance: f64,
    pub minutes_rounding: MinutesRounding,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let trend = TrendSettings::default();
        AnalysisConfig {
            lookback_days: 120,
            last_n: trend.last_n,
            role_decrease_tolerance: trend.role_decrease_tolerance,
            role_expansion_tolerance: trend.role_expansion_tolerance,
            minutes_rounding: trend.rounding,
        }
    }
}

impl AnalysisConfig {
    pub fn trend_settings(&self) -> TrendSettings {
        TrendSettings {
            last_n: self.last_n,
            role_decrease_tolerance: self.role_decrease_tolerance,
            role_expansion_tolerance: self.role_expansion_tolerance,
            rounding: self.minutes_rounding,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    pub minutes_threshold: f64,
    pub pacing_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            minutes_threshold: 18.0,
            pacing_ms: 150,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConsoleConfig {
    pub minutes_threshold: f64,
    /// Absent players above this many head-to-head minutes are flagged as
    /// key absences.
    pub key_minutes_threshold: f64,
    pub pacing_ms: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig {
            minutes_threshold: 15.0,
            key_minutes_threshold: 25.0,
            pacing_ms: 400,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TeamsConfig {
    /// Optional override for the built-in team list.
    pub csv_path: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/courtmetrics.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` does that first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE_NAME);
    let text = read_file(&path)?;
    let config = parse_config(&text, &path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse config text without validating it.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            // Never overwrite a user's edited file.
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Loads config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let provider = &config.provider;
    if provider.base_url.trim().is_empty() {
        return Err(invalid("provider.base_url", "must not be empty"));
    }
    if provider.timeout_secs == 0 {
        return Err(invalid("provider.timeout_secs", "must be greater than 0"));
    }
    if provider.max_attempts == 0 {
        return Err(invalid("provider.max_attempts", "must be greater than 0"));
    }

    let analysis = &config.analysis;
    if analysis.lookback_days == 0 {
        return Err(invalid("analysis.lookback_days", "must be greater than 0"));
    }
    if analysis.last_n == 0 {
        return Err(invalid("analysis.last_n", "must be greater than 0"));
    }

    let non_negative: &[(&str, f64)] = &[
        ("analysis.role_decrease_tolerance", analysis.role_decrease_tolerance),
        ("analysis.role_expansion_tolerance", analysis.role_expansion_tolerance),
        ("dashboard.minutes_threshold", config.dashboard.minutes_threshold),
        ("console.minutes_threshold", config.console.minutes_threshold),
        ("console.key_minutes_threshold", config.console.key_minutes_threshold),
    ];
    for (name, val) in non_negative {
        if !val.is_finite() || *val < 0.0 {
            return Err(invalid(name, format!("must be a finite number >= 0, got {val}")));
        }
    }

    if let Some(path) = &config.teams.csv_path {
        if path.trim().is_empty() {
            return Err(invalid("teams.csv_path", "must not be empty when set"));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Workspace root, where `defaults/` lives.
    fn project_root() -> PathBuf {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        assert!(
            root.join("defaults").exists(),
            "Cannot locate defaults/ directory from {:?}",
            root
        );
        root
    }

    fn scratch(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        tmp
    }

    fn write_config(base: &Path, text: &str) {
        fs::write(base.join("config").join(CONFIG_FILE_NAME), text).unwrap();
    }

    fn expect_validation_field(base: &Path, expected: &str) {
        match load_config_from(base).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn shipped_defaults_match_builtin_defaults() {
        let root = project_root();
        let text = fs::read_to_string(root.join("defaults").join(CONFIG_FILE_NAME)).unwrap();
        let config = parse_config(&text, Path::new("defaults/courtmetrics.toml")).unwrap();
        validate(&config).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn builtin_defaults() {
        let config = Config::default();
        assert_eq!(config.provider.max_attempts, 3);
        assert_eq!(config.provider.retry_delay_ms, 1000);
        assert_eq!(config.cache.capacity, 512);
        assert_eq!(config.analysis.lookback_days, 120);
        assert_eq!(config.analysis.last_n, 5);
        assert_eq!(config.dashboard.minutes_threshold, 18.0);
        assert_eq!(config.console.minutes_threshold, 15.0);
        assert_eq!(config.console.key_minutes_threshold, 25.0);
        assert_eq!(config.analysis.trend_settings(), TrendSettings::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = scratch("courtmetrics_config_partial");
        write_config(
            &tmp,
            r#"
[analysis]
last_n = 10
minutes_rounding = "round"

[provider]
column_case = "native"
"#,
        );
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.analysis.last_n, 10);
        assert_eq!(config.analysis.minutes_rounding, MinutesRounding::Round);
        assert_eq!(config.analysis.lookback_days, 120);
        assert_eq!(config.provider.column_case, ColumnCase::Native);
        assert_eq!(config.provider.timeout_secs, 30);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_max_attempts() {
        let tmp = scratch("courtmetrics_config_attempts");
        write_config(&tmp, "[provider]\nmax_attempts = 0\n");
        expect_validation_field(&tmp, "provider.max_attempts");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_last_n() {
        let tmp = scratch("courtmetrics_config_last_n");
        write_config(&tmp, "[analysis]\nlast_n = 0\n");
        expect_validation_field(&tmp, "analysis.last_n");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_negative_threshold() {
        let tmp = scratch("courtmetrics_config_threshold");
        write_config(&tmp, "[dashboard]\nminutes_threshold = -1.0\n");
        expect_validation_field(&tmp, "dashboard.minutes_threshold");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_nan_tolerance() {
        let tmp = scratch("courtmetrics_config_nan");
        write_config(&tmp, "[analysis]\nrole_decrease_tolerance = nan\n");
        expect_validation_field(&tmp, "analysis.role_decrease_tolerance");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_base_url() {
        let tmp = scratch("courtmetrics_config_base_url");
        write_config(&tmp, "[provider]\nbase_url = \"  \"\n");
        expect_validation_field(&tmp, "provider.base_url");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn unknown_rounding_is_parse_error() {
        let tmp = scratch("courtmetrics_config_rounding");
        write_config(&tmp, "[analysis]\nminutes_rounding = \"ceil\"\n");
        assert!(matches!(
            load_config_from(&tmp).unwrap_err(),
            ConfigError::ParseError { .. }
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_when_config_missing() {
        let tmp = scratch("courtmetrics_config_missing");
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with(CONFIG_FILE_NAME)),
            other => panic!("expected FileNotFound, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_then_skips_existing() {
        let tmp = std::env::temp_dir().join("courtmetrics_config_ensure");
        let _ = fs::remove_dir_all(&tmp);
        let defaults = tmp.join("defaults");
        fs::create_dir_all(&defaults).unwrap();
        fs::write(defaults.join(CONFIG_FILE_NAME), "[cache]\ncapacity = 8\n").unwrap();
        fs::write(defaults.join("teams.csv.example"), "id,abbreviation,name\n").unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert_eq!(copied, vec![tmp.join("config").join(CONFIG_FILE_NAME)]);
        assert!(!tmp.join("config/teams.csv.example").exists());

        // An edited config file survives a second run.
        write_config(&tmp, "[cache]\ncapacity = 64\n");
        assert!(ensure_config_files(&tmp).unwrap().is_empty());
        assert_eq!(load_config_from(&tmp).unwrap().cache.capacity, 64);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("courtmetrics_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            ensure_config_files(&tmp).unwrap_err(),
            ConfigError::DefaultsCopyError { .. }
        ));
        let _ = fs::remove_dir_all(&tmp);
    }
}
