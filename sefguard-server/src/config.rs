use anyhow::{Context, Result};
use sefguard_core::{ClockConfig, Dataset};
use std::fs;
use std::path::Path;

/// Dataset from `path`, or the built-in seed data when no path is given.
pub fn load_dataset(path: Option<&Path>) -> Result<Dataset> {
    let Some(path) = path else {
        return Ok(Dataset::seed());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading dataset {}", path.display()))?;
    Dataset::from_json(&raw).with_context(|| format!("parsing dataset {}", path.display()))
}

/// Clock pacing from `path`, or the default demo pacing.
pub fn load_clock_config(path: Option<&Path>) -> Result<ClockConfig> {
    let Some(path) = path else {
        return Ok(ClockConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading clock config {}", path.display()))?;
    ClockConfig::from_json(&raw)
        .with_context(|| format!("parsing clock config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(label: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "sefguard-config-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_without_paths() {
        assert_eq!(load_dataset(None).unwrap(), Dataset::seed());
        assert_eq!(load_clock_config(None).unwrap(), ClockConfig::default());
    }

    #[test]
    fn loads_files_and_reports_context() {
        let path = temp_file("clock", r#"{ "tick_interval_ms": 500 }"#);
        assert_eq!(load_clock_config(Some(&path)).unwrap().tick_interval_ms, 500);

        let path = temp_file("dataset", r#"{ "responders": [], "safeHavens": [] }"#);
        assert_eq!(load_dataset(Some(&path)).unwrap(), Dataset::empty());

        let path = temp_file("bad", "{ nope");
        let err = load_dataset(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("parsing dataset"));

        let missing = std::env::temp_dir().join("sefguard-config-does-not-exist.json");
        let err = load_clock_config(Some(&missing)).unwrap_err();
        assert!(format!("{err:#}").contains("reading clock config"));
    }
}
