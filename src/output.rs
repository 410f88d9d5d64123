use std::fs;
use std::path::Path;

use jiff::Timestamp;
use jiff::tz::Offset;
use serde::Serialize;

use crate::error::{Error, Result};

/// The JSON document written on every successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub generated_at_utc: String,
    pub source: String,
    #[serde(rename = "rateName")]
    pub rate_name: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub value: f64,
}

impl Record {
    pub fn new(source: &str, rate_name: &str, date: String, value: f64) -> Self {
        Self {
            generated_at_utc: Timestamp::now().display_with_offset(Offset::UTC).to_string(),
            source: source.to_string(),
            rate_name: rate_name.to_string(),
            date,
            value,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Overwrite `path` with the record, creating missing parent directories.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: "create directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, json).map_err(|source| Error::Io {
            operation: "write",
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(path = %path.display(), date = %self.date, value = self.value, "record written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> Record {
        Record {
            generated_at_utc: "2024-03-01T06:00:00+00:00".to_string(),
            source: "https://example.com/rss".to_string(),
            rate_name: "SARH".to_string(),
            date: "2024-03-01".to_string(),
            value: 1.5,
        }
    }

    #[test]
    fn test_json_layout() {
        assert_eq!(
            record().to_json().unwrap(),
            r#"{
  "generated_at_utc": "2024-03-01T06:00:00+00:00",
  "source": "https://example.com/rss",
  "rateName": "SARH",
  "date": "2024-03-01",
  "value": 1.5
}"#
        );
    }

    #[test]
    fn test_non_ascii_kept() {
        let mut rec = record();
        rec.rate_name = "Zinssatz für Übernacht".to_string();
        assert!(rec.to_json().unwrap().contains("Zinssatz für Übernacht"));
    }

    #[test]
    fn test_generated_at_is_utc() {
        let rec = Record::new("src", "SARH", "2024-03-01".to_string(), 1.0);
        assert!(rec.generated_at_utc.ends_with("+00:00"));
        assert!(rec.generated_at_utc.parse::<Timestamp>().is_ok());
    }

    #[test]
    fn test_write_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/public/result.json");

        record().write(&path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            record().to_json().unwrap()
        );

        fs::write(&path, "stale content longer than the record ".repeat(20)).unwrap();
        let mut newer = record();
        newer.value = 1.75;
        newer.write(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), newer.to_json().unwrap());
    }
}
