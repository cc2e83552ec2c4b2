// Scenario generation from a household load profile.
//
// The load profile is a CSV with a `Time` column and one column per load.
// Each profile row is a 15 minute slot. For every configured day/factor
// pair the generator emits one scenario row per slot:
// `[from, to, {load: "<value>*<factor>"}]`, where `from`/`to` are left
// as arithmetic expressions for the simulation to evaluate.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::wz_error::ScenarioError;
use crate::wz_interface::Number;

pub const TIME_COLUMN: &str = "Time";

/// One scenario row: time from, time to, scaled load per column
pub type ScenarioRow = (String, String, BTreeMap<String, String>);

/// A day of the scenario and the factor its loads are scaled with
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScenarioEntry {
    pub day: u32,
    pub factor: Number,
}

/// Generator configuration (YAML)
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScenarioConfig {
    /// Load profile CSV to read
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Scenario YAML to write
    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default = "default_entries")]
    pub entries: Vec<ScenarioEntry>,
}

fn default_input() -> PathBuf {
    PathBuf::from("loads_household.csv")
}

fn default_output() -> PathBuf {
    PathBuf::from("household_percentages/all_households_to_zero.yml")
}

fn default_entries() -> Vec<ScenarioEntry> {
    vec![ScenarioEntry {
        day: 0,
        factor: Number::Float(0.0),
    }]
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
            entries: default_entries(),
        }
    }
}

impl ScenarioConfig {
    pub fn from_yaml_file(path: &Path) -> Result<Self, ScenarioError> {
        let content = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

/// Load profile with the `Time` column dropped
#[derive(Clone, Debug, PartialEq)]
pub struct LoadProfile {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl LoadProfile {
    pub fn from_path(path: &Path) -> Result<Self, ScenarioError> {
        let file = File::open(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScenarioError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let time_index = headers
            .iter()
            .position(|h| h == TIME_COLUMN)
            .ok_or(ScenarioError::MissingColumn {
                column: TIME_COLUMN,
            })?;

        let keep = |record: &csv::StringRecord| -> Vec<String> {
            record
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != time_index)
                .map(|(_, value)| value.to_string())
                .collect()
        };

        let columns = keep(&headers);
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(keep(&record?));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of time slots
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the scenario rows, entry by entry, slot by slot
pub fn create_scenario(profile: &LoadProfile, entries: &[ScenarioEntry]) -> Vec<ScenarioRow> {
    let mut scenario = Vec::with_capacity(entries.len() * profile.len());
    for entry in entries {
        for (slot, row) in profile.rows.iter().enumerate() {
            let time_from = format!("{}*24*60*60+{}*900", entry.day, slot);
            let time_to = format!("{}+899", time_from);
            let values = profile
                .columns
                .iter()
                .zip(row)
                .map(|(column, value)| (column.clone(), format!("{}*{}", value, entry.factor)))
                .collect();
            scenario.push((time_from, time_to, values));
        }
    }
    scenario
}

/// Write the scenario as YAML, creating the parent directory if needed
pub fn write_scenario(scenario: &[ScenarioRow], path: &Path) -> Result<(), ScenarioError> {
    let io_error = |source: std::io::Error| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
    serde_yaml::to_writer(&mut writer, scenario)?;
    writer.flush().map_err(io_error)
}

/// Read the profile, build the scenario and write it; returns the row count
pub fn run(config: &ScenarioConfig) -> Result<usize, ScenarioError> {
    let profile = LoadProfile::from_path(&config.input)?;
    info!(
        "Loaded {} slots x {} loads from {}",
        profile.len(),
        profile.columns().len(),
        config.input.display()
    );

    let scenario = create_scenario(&profile, &config.entries);
    write_scenario(&scenario, &config.output)?;
    info!(
        "Wrote {} scenario rows to {}",
        scenario.len(),
        config.output.display()
    );
    Ok(scenario.len())
}
