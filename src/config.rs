use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::liturgy::HolyDays;
use crate::provider::{Error, Result};
use crate::title::{self, Symbols};

const CONFIG_PATH_ENV_VAR: &str = "ORDO_CONFIG_FILE";

pub fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("ordo").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".ordo.toml"));
    }

    locations
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HolyDaysConfig {
    /// Recognize the built-in 1962 holy days.
    pub builtin: bool,
    /// Additional titles, matched like the built-in ones.
    pub extra: Vec<String>,
}

impl Default for HolyDaysConfig {
    fn default() -> Self {
        HolyDaysConfig {
            builtin: true,
            extra: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mark_sundays_as_holy: bool,
    pub symbols: Symbols,
    pub holy_days: HolyDaysConfig,
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        fs::read_to_string(path)?.parse::<Config>().map_err(|mut e| {
            let detail = e.message.take().unwrap_or_default();
            e.with_msg(&format!("'{}': {}", path.display(), detail))
        })
    }

    pub fn holy_days(&self) -> HolyDays {
        HolyDays::new(
            self.holy_days.builtin,
            self.holy_days
                .extra
                .iter()
                .map(|t| title::normalize(t, &self.symbols))
                .filter(|t| !t.is_empty()),
        )
    }
}

/// Loads `configfile` if given, otherwise the first existing default location.
///
/// Falls back to the built-in configuration if no file exists.
pub fn load_suitable_config(configfile: Option<&Path>) -> Result<Config> {
    if let Some(path) = configfile {
        return Config::from_file(path);
    }

    for path in find_configfile_locations() {
        if path.is_file() {
            log::info!("Using config file '{}'", path.display());
            return Config::from_file(&path);
        }
    }

    log::info!("No config file found, using defaults");
    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ErrorKind;

    #[test]
    fn empty_config_is_default() {
        let config = "".parse::<Config>().unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.mark_sundays_as_holy);
        assert!(config.holy_days.builtin);
        assert_eq!(config.symbols, Symbols::default());
    }

    #[test]
    fn full_config() {
        let config = r#"
            mark_sundays_as_holy = true

            [symbols]
            fast = "F"

            [holy_days]
            builtin = false
            extra = ["  St.   Lucy ", "F Candlemas", ""]
        "#
        .parse::<Config>()
        .unwrap();

        assert!(config.mark_sundays_as_holy);
        assert_eq!(config.symbols.fast, "F");
        assert_eq!(config.symbols.holy_day, title::DEFAULT_HOLY_DAY_SYMBOL);

        let holy_days = config.holy_days();
        assert!(holy_days.contains("st. lucy"));
        assert!(holy_days.contains("candlemas"));
        assert!(!holy_days.contains("christmas"));
        assert_eq!(holy_days.len(), 2);
    }

    #[test]
    fn invalid_config() {
        let err = "mark_sundays_as_holy = \"yes\"".parse::<Config>().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ConfigError));
    }

    #[test]
    fn invalid_file_names_path() {
        let path = env::temp_dir().join(format!("ordo-invalid-{}.toml", std::process::id()));
        fs::write(&path, "mark_sundays_as_holy = \"yes\"").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        fs::remove_file(&path).unwrap();

        let msg = err.to_string();
        assert!(matches!(err.kind, ErrorKind::ConfigError));
        assert!(msg.starts_with("invalid configuration: '"));
        assert!(msg.contains(&path.display().to_string()));
        assert_eq!(msg.matches("invalid configuration").count(), 1);
    }

    #[test]
    fn missing_explicit_file() {
        let err = load_suitable_config(Some(Path::new("/nonexistent/ordo.toml"))).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::IOError(_)));
    }
}
