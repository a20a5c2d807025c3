//! Process-level defaults.
//!
//! Settings are read once where a pipeline is assembled and handed to the
//! filters that need them; filters never look them up on their own.

use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Dust score at or above which a sequence counts as low complexity.
pub const DEFAULT_DUST_THRESHOLD: f64 = 7.0;

/// Records per packet.
pub const DEFAULT_PACKET_SIZE: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub default_dust_threshold: f64,
    pub packet_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_dust_threshold: DEFAULT_DUST_THRESHOLD,
            packet_size: DEFAULT_PACKET_SIZE,
        }
    }
}

impl Settings {
    /// Load from YAML string. Missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(FilterError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(FilterError::from)
    }

    /// Load from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_dust_threshold, 7.0);
        assert_eq!(settings.packet_size, 1000);
    }

    #[test]
    fn test_partial_yaml() {
        let settings = Settings::from_yaml("packet_size: 250\n").unwrap();
        assert_eq!(settings.packet_size, 250);
        assert_eq!(settings.default_dust_threshold, DEFAULT_DUST_THRESHOLD);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "default_dust_threshold: 5.5").unwrap();
        file.flush().unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.default_dust_threshold, 5.5);

        let yaml = settings.to_yaml().unwrap();
        assert_eq!(Settings::from_yaml(&yaml).unwrap(), settings);
    }
}
