//! INI file configuration adapter.

use crate::domain::error::GbceError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file(path: &Path) -> Result<Self, GbceError> {
        let mut config = Ini::new();
        config.load(path).map_err(|reason| GbceError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, GbceError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| GbceError::ConfigParse {
                file: "<string>".into(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[metrics]
window_seconds = 300
as_of = 2024-01-15T10:05:00Z

[data]
stocks = /data/stocks.csv
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("data", "stocks"),
            Some("/data/stocks.csv".to_string())
        );
        assert_eq!(
            adapter.get_string("metrics", "as_of"),
            Some("2024-01-15T10:05:00Z".to_string())
        );
    }

    #[test]
    fn section_and_key_names_are_case_insensitive() {
        let adapter = FileConfigAdapter::from_string("[Metrics]\nWindow_Seconds = 60\n").unwrap();
        assert_eq!(
            adapter.get_string("metrics", "window_seconds"),
            Some("60".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[metrics]\nwindow_seconds = 60\n").unwrap();
        assert_eq!(adapter.get_string("metrics", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_bool_accepts_common_spellings() {
        let adapter = FileConfigAdapter::from_string(
            "[report]\na = true\nb = yes\nc = 1\nd = false\ne = no\nf = 0\ng = maybe\n",
        )
        .unwrap();
        assert!(adapter.get_bool("report", "a", false));
        assert!(adapter.get_bool("report", "b", false));
        assert!(adapter.get_bool("report", "c", false));
        assert!(!adapter.get_bool("report", "d", true));
        assert!(!adapter.get_bool("report", "e", true));
        assert!(!adapter.get_bool("report", "f", true));
        assert!(adapter.get_bool("report", "g", true));
        assert!(adapter.get_bool("report", "missing", true));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[data]\ntrades = /path/to/trades.csv\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("data", "trades"),
            Some("/path/to/trades.csv".to_string())
        );
    }

    #[test]
    fn from_file_missing_file_names_path() {
        let Err(err) = FileConfigAdapter::from_file(Path::new("/nonexistent/path/gbce.ini")) else {
            panic!("expected a config parse error");
        };
        assert!(matches!(err, GbceError::ConfigParse { file, .. } if file.contains("gbce.ini")));
    }
}
