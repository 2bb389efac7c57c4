//! Report setting in TOML.

use crate::errors::*;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use toml;

/// Where the measurement files live and where charts go. Every field has a
/// default, so an empty file (or no file) is a valid setting.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Setting {
    /// Directory holding the input CSV files.
    pub input_dir: PathBuf,

    /// Directory the PNG charts are written to. Created if missing.
    pub output_dir: PathBuf,

    /// Scenario 1 measurements (`S, T, Time, Memory, Length`).
    pub scenario1: String,

    /// Scenario 2 measurements (`S, T, Time, Memory, Length, Delta`).
    pub scenario2: String,

    /// DP matrix measurements (`rows, cols, time_ms, memory_MB`).
    pub dp_results: String,
}

impl Default for Setting {
    fn default() -> Self {
        Setting {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            scenario1: "scenario1.csv".to_string(),
            scenario2: "scenario2.csv".to_string(),
            dp_results: "results.csv".to_string(),
        }
    }
}

impl Setting {
    /// Reads a setting file.
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Setting> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let mut contents = String::new();
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut contents))
            .chain_err(|| ErrorKind::Setting(name.clone()))?;
        let setting = Setting::parse(&contents).chain_err(|| ErrorKind::Setting(name.clone()))?;
        debug!("setting from {}: {:?}", name, setting);
        Ok(setting)
    }

    /// Parses TOML text.
    pub fn parse(contents: &str) -> Result<Setting> {
        Ok(toml::from_str(contents)?)
    }

    /// Full path of an input file.
    pub fn input(&self, file: &str) -> PathBuf {
        self.input_dir.join(file)
    }

    /// Full path of an output file.
    pub fn output(&self, file: &str) -> PathBuf {
        self.output_dir.join(file)
    }
}
