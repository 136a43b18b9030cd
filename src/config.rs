//! Parser configuration supplied by the caller.
//!
//! The guided editor knows which Molpro commands it can offer as methods,
//! and where the job lives on disk. Both are passed explicitly to every
//! parse call through [`ParserConfig`] rather than held as global state, so
//! independent parses can run on different threads.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Commands recognised as computational steps when no list is configured.
pub const DEFAULT_METHODS: &[&str] = &[
    "HF", "RHF", "UHF", "KS", "RKS", "UKS", "LDF-RHF", "LDF-UHF",
    "MP2", "RMP2", "UMP2", "MP3", "MP4",
    "CISD", "QCISD", "QCISD(T)",
    "CCSD", "CCSD(T)", "UCCSD", "UCCSD(T)", "RCCSD", "RCCSD(T)", "BCCD", "BCCD(T)",
    "LMP2", "LCCSD", "LCCSD(T)", "PNO-LMP2", "PNO-LCCSD", "PNO-LCCSD(T)",
    "CASSCF", "MULTI", "MCSCF", "MRCI", "CI", "RS2", "RS2C", "RS3",
    "OCC", "CLOSED", "CORE", "FROZEN", "WF",
    "OPTG", "FREQUENCIES",
];

/// Configuration threaded into every parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Commands accepted as steps, compared case-insensitively
    pub allowed_methods: Vec<String>,
    /// Directory against which external geometry files are resolved
    pub directory: PathBuf,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            allowed_methods: DEFAULT_METHODS.iter().map(|m| m.to_string()).collect(),
            directory: PathBuf::from("."),
        }
    }
}

impl ParserConfig {
    /// Creates a configuration with an explicit method list.
    ///
    /// # Examples
    ///
    /// ```
    /// use mpspec::config::ParserConfig;
    ///
    /// let config = ParserConfig::new(["RHF", "CCSD"], ".");
    /// assert!(config.allows("ccsd"));
    /// assert!(!config.allows("mrci"));
    /// ```
    pub fn new<I, S>(methods: I, directory: impl AsRef<Path>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_methods: methods.into_iter().map(Into::into).collect(),
            directory: directory.as_ref().to_path_buf(),
        }
    }

    /// Returns a copy resolving external files against `directory`.
    pub fn with_directory(mut self, directory: impl AsRef<Path>) -> Self {
        self.directory = directory.as_ref().to_path_buf();
        self
    }

    /// Returns `true` when `command` is in the allowed list.
    pub fn allows(&self, command: &str) -> bool {
        self.allowed_methods
            .iter()
            .any(|m| m.trim().eq_ignore_ascii_case(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_methods() {
        let config = ParserConfig::default();
        assert!(config.allows("rhf"));
        assert!(config.allows("ccsd(t)"));
        assert!(config.allows("Frequencies"));
        assert!(!config.allows("thermo"));
        assert_eq!(config.directory, PathBuf::from("."));
    }

    #[test]
    fn test_with_directory() {
        let config = ParserConfig::new(["RHF"], "/tmp").with_directory("/srv/jobs");
        assert_eq!(config.directory, PathBuf::from("/srv/jobs"));
        assert_eq!(config.allowed_methods, vec!["RHF".to_string()]);
    }
}
