// TextureCatalog - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and
// config.toml loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for TextureCatalog data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/texturecatalog/ or %APPDATA%\TextureCatalog\config\)
    pub config_dir: PathBuf,

    /// Data directory holding the record collection.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Default location of the record collection.
    pub fn default_data_file(&self) -> PathBuf {
        self.data_dir.join(constants::DATA_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[storage]` section.
    pub storage: StorageSection,
    /// `[export]` section.
    pub export: ExportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[storage]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Path of the record collection file. Relative paths resolve against
    /// the config directory.
    pub data_file: Option<String>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Lines per page in document exports.
    pub page_lines: Option<usize>,
    /// Wrap width in document exports.
    pub line_width: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Storage --
    /// Data file override. `None` = platform default.
    pub data_file: Option<PathBuf>,

    // -- Export --
    /// Lines per page in document exports.
    pub page_lines: usize,
    /// Wrap width in document exports.
    pub line_width: usize,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            page_lines: constants::DEFAULT_PAGE_LINES,
            line_width: constants::DEFAULT_LINE_WIDTH,
            log_level: None,
            log_file: None,
        }
    }
}

/// Path of config.toml inside `config_dir`.
pub fn config_path(config_dir: &Path) -> PathBuf {
    config_dir.join(constants::CONFIG_FILE_NAME)
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unparseable, returns defaults with a warning; the
/// application still starts but the user is informed.
///
/// Called before logging is initialised (the log level lives in this file),
/// so problems are reported through the returned warnings only.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_path(config_dir);
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path,
                source: e,
            };
            warnings.push(format!("{err}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    match toml::from_str::<RawConfig>(&content) {
        Ok(raw) => {
            let (config, validation_warnings) = validate(raw, config_dir);
            warnings.extend(validation_warnings);
            (config, warnings)
        }
        Err(e) => {
            let err = ConfigError::TomlParse {
                path: config_path,
                source: e,
            };
            warnings.push(format!(
                "{err}. Using defaults. See config.example.toml for the expected format."
            ));
            (AppConfig::default(), warnings)
        }
    }
}

/// Validate each field against named constants, accumulating all problems.
pub fn validate(raw: RawConfig, config_dir: &Path) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings = Vec::new();

    // -- Storage: data_file --
    if let Some(ref file) = raw.storage.data_file {
        if !file.trim().is_empty() {
            let path = PathBuf::from(file.trim());
            config.data_file = Some(if path.is_relative() {
                config_dir.join(path)
            } else {
                path
            });
        }
    }

    // -- Export: page_lines --
    if let Some(lines) = raw.export.page_lines {
        if (constants::MIN_PAGE_LINES..=constants::MAX_PAGE_LINES).contains(&lines) {
            config.page_lines = lines;
        } else {
            warnings.push(out_of_range(
                "[export] page_lines",
                lines,
                constants::MIN_PAGE_LINES,
                constants::MAX_PAGE_LINES,
                constants::DEFAULT_PAGE_LINES,
            ));
        }
    }

    // -- Export: line_width --
    if let Some(width) = raw.export.line_width {
        if (constants::MIN_LINE_WIDTH..=constants::MAX_LINE_WIDTH).contains(&width) {
            config.line_width = width;
        } else {
            warnings.push(out_of_range(
                "[export] line_width",
                width,
                constants::MIN_LINE_WIDTH,
                constants::MAX_LINE_WIDTH,
                constants::DEFAULT_LINE_WIDTH,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            let err = ConfigError::ValueOutOfRange {
                field: "[logging] level".to_string(),
                value: level.clone(),
                expected: constants::VALID_LOG_LEVELS.join(", "),
            };
            warnings.push(format!(
                "{err}. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    (config, warnings)
}

fn out_of_range(field: &str, value: usize, min: usize, max: usize, default: usize) -> String {
    let err = ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected: format!("{min}-{max}"),
    };
    format!("{err}. Using default ({default}).")
}
