//! INI file configuration adapter.
//!
//! Values are trimmed before typed parsing, so `top_n =  5 ` reads as 5.

use crate::domain::error::CountertrendError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    ini: Ini,
}

fn parse_error(file: impl Into<String>, reason: impl Into<String>) -> CountertrendError {
    CountertrendError::ConfigParse {
        file: file.into(),
        reason: reason.into(),
    }
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CountertrendError> {
        let path = path.as_ref();
        let mut ini = Ini::new();
        ini.load(path)
            .map_err(|reason| parse_error(path.display().to_string(), reason))?;
        Ok(Self { ini })
    }

    pub fn from_string(content: &str) -> Result<Self, CountertrendError> {
        let mut ini = Ini::new();
        ini.read(content.to_string())
            .map_err(|reason| parse_error("<string>", reason))?;
        Ok(Self { ini })
    }

    fn value(&self, section: &str, key: &str) -> Option<String> {
        self.ini
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.value(section, key)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.value(section, key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
