//! Configuration management for mpspec.
//!
//! Settings are read from INI-format files with the following precedence:
//!
//! 1. Local configuration (`./mpspec_config.cfg`)
//! 2. User configuration (`~/.config/mpspec/mpspec_config.cfg`)
//! 3. System configuration (`/etc/mpspec/mpspec_config.cfg`)
//! 4. Built-in defaults
//!
//! # Configuration File Format
//!
//! ```ini
//! [methods]
//! allowed = RHF, UHF, RKS, CCSD(T), MRCI
//!
//! [geometry]
//! directory = .
//!
//! [logging]
//! level = info
//! ```
//!
//! The settings end up in a [`ParserConfig`], which is what the parser
//! actually consumes.

use crate::config::{ParserConfig, DEFAULT_METHODS};
use configparser::ini::Ini;
use log::{debug, info, warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the settings file in every location.
pub const CONFIG_FILE_NAME: &str = "mpspec_config.cfg";

/// Errors that can occur during configuration loading and processing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error when reading configuration files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// INI parsing error
    #[error("INI parsing error: {0}")]
    IniParse(String),
    /// Invalid configuration value
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// All program settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Methods offered as computational steps
    pub methods: MethodSettings,
    /// External geometry lookup
    pub geometry: GeometrySettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Methods recognised as computational steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSettings {
    /// Allowed method commands (default: the built-in list)
    pub allowed: Vec<String>,
}

impl Default for MethodSettings {
    fn default() -> Self {
        Self {
            allowed: DEFAULT_METHODS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Where external geometry files are looked up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometrySettings {
    /// Base directory for `geometry=<file>` references (default: ".")
    pub directory: String,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
        }
    }
}

/// Logging configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (default: "info")
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingSettings {
    /// The level as a filter for the logger; unknown names give `Info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.level.trim().parse().unwrap_or(LevelFilter::Info)
    }
}

/// Configuration manager that handles loading and accessing program settings.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    settings: Settings,
    config_source: String,
}

impl SettingsManager {
    /// Loads configuration from the available configuration files.
    ///
    /// Files that exist but cannot be parsed are skipped with a warning.
    pub fn load() -> Result<Self, ConfigError> {
        let (settings, source) = Self::load_from_files()?;
        info!("Configuration loaded from: {}", source);
        Ok(Self {
            settings,
            config_source: source,
        })
    }

    /// Loads one configuration file on top of the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or holds an invalid
    /// value.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let mut settings = Settings::default();
        settings.merge(Self::load_config(path)?);
        Ok(Self {
            settings,
            config_source: format!("file ({})", path.display()),
        })
    }

    /// Returns the source of the loaded configuration.
    pub fn config_source(&self) -> &str {
        &self.config_source
    }

    /// Gets a reference to the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Gets the logging settings.
    pub fn logging(&self) -> &LoggingSettings {
        &self.settings.logging
    }

    /// Builds the parser configuration from these settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use mpspec::settings::SettingsManager;
    ///
    /// let config = SettingsManager::default().parser_config();
    /// assert!(config.allows("ccsd(t)"));
    /// ```
    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig::new(
            self.settings.methods.allowed.iter().cloned(),
            &self.settings.geometry.directory,
        )
    }

    /// Loads configuration from files with hierarchical precedence.
    fn load_from_files() -> Result<(Settings, String), ConfigError> {
        let mut settings = Settings::default();
        let mut config_source = "built-in defaults".to_string();

        let candidates = [
            ("system", Self::get_system_config_path()),
            ("user", Self::get_user_config_path()),
            ("local", Some(PathBuf::from(CONFIG_FILE_NAME))),
        ];
        for (kind, path) in candidates {
            let Some(path) = path.filter(|p| p.exists()) else {
                continue;
            };
            match Self::load_config(&path) {
                Ok(config) => {
                    settings.merge(config);
                    config_source = format!("{} config ({})", kind, path.display());
                    debug!("Loaded {} configuration from: {}", kind, path.display());
                }
                Err(e) => warn!("Failed to load {} config from {}: {}", kind, path.display(), e),
            }
        }

        Ok((settings, config_source))
    }

    /// Loads configuration from a single INI file.
    ///
    /// Sections and values that are absent stay empty so that
    /// [`Settings::merge`] leaves lower-priority values alone.
    fn load_config(path: &Path) -> Result<Settings, ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut ini = Ini::new();
        ini.read(content)
            .map_err(|e| ConfigError::IniParse(format!("Failed to parse INI: {}", e)))?;

        let mut settings = Settings {
            methods: MethodSettings { allowed: Vec::new() },
            geometry: GeometrySettings {
                directory: String::new(),
            },
            logging: LoggingSettings { level: String::new() },
        };

        if let Some(methods_map) = ini.get_map_ref().get("methods") {
            settings.methods = Self::parse_methods(methods_map);
        }
        if let Some(geometry_map) = ini.get_map_ref().get("geometry") {
            if let Some(Some(directory)) = geometry_map.get("directory") {
                settings.geometry.directory = directory.trim().to_string();
            }
        }
        if let Some(logging_map) = ini.get_map_ref().get("logging") {
            settings.logging = Self::parse_logging(logging_map)?;
        }

        Ok(settings)
    }

    /// Parses the comma-separated method list.
    fn parse_methods(section: &HashMap<String, Option<String>>) -> MethodSettings {
        let allowed = match section.get("allowed") {
            Some(Some(list)) => list
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
            _ => Vec::new(),
        };
        MethodSettings { allowed }
    }

    /// Parses the logging section, rejecting unknown level names.
    fn parse_logging(section: &HashMap<String, Option<String>>) -> Result<LoggingSettings, ConfigError> {
        let mut logging = LoggingSettings { level: String::new() };
        if let Some(Some(level)) = section.get("level") {
            level
                .trim()
                .parse::<LevelFilter>()
                .map_err(|_| ConfigError::InvalidValue(format!("Invalid log level: {}", level)))?;
            logging.level = level.trim().to_lowercase();
        }
        Ok(logging)
    }

    /// Gets the system configuration file path.
    fn get_system_config_path() -> Option<PathBuf> {
        #[cfg(unix)]
        {
            Some(PathBuf::from("/etc/mpspec").join(CONFIG_FILE_NAME))
        }
        #[cfg(windows)]
        {
            std::env::var("PROGRAMDATA")
                .ok()
                .map(|pd| PathBuf::from(pd).join("mpspec").join(CONFIG_FILE_NAME))
        }
    }

    /// Gets the user configuration file path.
    fn get_user_config_path() -> Option<PathBuf> {
        #[cfg(unix)]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".config").join("mpspec").join(CONFIG_FILE_NAME))
        }
        #[cfg(windows)]
        {
            std::env::var("APPDATA")
                .ok()
                .map(|appdata| PathBuf::from(appdata).join("mpspec").join(CONFIG_FILE_NAME))
        }
    }
}

impl Default for SettingsManager {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            config_source: "built-in defaults".to_string(),
        }
    }
}

impl SettingsManager {
    /// Creates a commented settings file with every option at its default.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mpspec::settings::SettingsManager;
    /// use std::path::Path;
    ///
    /// SettingsManager::create_template(Path::new("mpspec_config.cfg")).unwrap();
    /// ```
    pub fn create_template(path: &Path) -> Result<(), ConfigError> {
        fs::write(path, Self::generate_template_content())?;
        info!("Created settings template at: {}", path.display());
        Ok(())
    }

    /// Generates the content for a mpspec_config.cfg template file.
    fn generate_template_content() -> String {
        format!(
            r#"# mpspec Configuration File
#
# Configuration files are loaded in hierarchical order with local settings taking precedence:
#
# 1. Current working directory (./mpspec_config.cfg) - highest priority
# 2. User config directory (~/.config/mpspec/mpspec_config.cfg on Unix, %APPDATA%/mpspec/mpspec_config.cfg on Windows)
# 3. System config directory (/etc/mpspec/mpspec_config.cfg on Unix, %PROGRAMDATA%/mpspec/mpspec_config.cfg on Windows)
# 4. Built-in defaults (fallback)
#
# Any missing sections or values will use the built-in defaults shown below.

[methods]
# Molpro commands recognised as computational steps (comma-separated, case-insensitive)
# optg and frequencies are always recognised as job-type steps
# Prefixed forms (df-, pno-, ldf-) are recognised when the base command is listed
allowed = {}

[geometry]
# Directory against which geometry=<file> references are resolved (default: .)
directory = {}

[logging]
# Log level: off, error, warn, info, debug, trace (default: info)
# debug shows how every statement is classified
level = {}

# Example custom configurations:
#
# Offer only a small set of methods in the guided editor:
# [methods]
# allowed = RHF, RKS, CCSD(T), OPTG, FREQUENCIES
#
# Trace classification decisions:
# [logging]
# level = debug
"#,
            MethodSettings::default().allowed.join(", "),
            GeometrySettings::default().directory,
            LoggingSettings::default().level,
        )
    }
}

impl Settings {
    /// Merges another Settings instance into this one; non-empty values in
    /// `other` win.
    fn merge(&mut self, other: Settings) {
        if !other.methods.allowed.is_empty() {
            self.methods.allowed = other.methods.allowed;
        }
        if !other.geometry.directory.is_empty() {
            self.geometry.directory = other.geometry.directory;
        }
        if !other.logging.level.is_empty() {
            self.logging.level = other.logging.level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let manager = SettingsManager::default();
        assert_eq!(manager.config_source(), "built-in defaults");
        assert_eq!(manager.logging().level_filter(), LevelFilter::Info);
        let config = manager.parser_config();
        assert!(config.allows("rhf"));
        assert_eq!(config.directory, PathBuf::from("."));
    }

    #[test]
    fn test_load_from_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "[methods]\nallowed = rhf, ccsd(t) ,\n\n[geometry]\ndirectory = /srv/jobs\n",
        )
        .unwrap();

        let manager = SettingsManager::load_from_path(&path).unwrap();
        assert_eq!(manager.settings().methods.allowed, vec!["RHF", "CCSD(T)"]);
        assert_eq!(manager.logging().level, "info");
        let config = manager.parser_config();
        assert!(config.allows("ccsd(t)"));
        assert!(!config.allows("mrci"));
        assert_eq!(config.directory, PathBuf::from("/srv/jobs"));
    }

    #[test]
    fn test_invalid_level_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[logging]\nlevel = loud\n").unwrap();
        assert!(matches!(
            SettingsManager::load_from_path(&path),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_template_loads_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        SettingsManager::create_template(&path).unwrap();

        let manager = SettingsManager::load_from_path(&path).unwrap();
        let defaults = Settings::default();
        assert_eq!(manager.settings().methods.allowed, defaults.methods.allowed);
        assert_eq!(manager.settings().geometry.directory, ".");
        assert_eq!(manager.logging().level_filter(), LevelFilter::Info);
    }
}
