use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rules::RuleTable;
use crate::sequencer::DEFAULT_EPOCH_YEAR;

/// Accepted range for `epoch_year`; rollovers past the end stay well inside
/// what `chrono` can represent.
pub const MIN_EPOCH_YEAR: i32 = 1;
pub const MAX_EPOCH_YEAR: i32 = 9999;

/// Everything a document run can be tuned with.
///
/// Every section has defaults, so a config file only needs the keys it
/// changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Year given to the first dated row; statements print "Mon DD" only
    pub epoch_year: i32,
    pub rules: RuleTable,
    pub extractor: ExtractorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Command (program + leading args) that runs tabula, e.g.
    /// `["java", "-jar", "/opt/tabula.jar"]`
    pub command: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            epoch_year: DEFAULT_EPOCH_YEAR,
            rules: RuleTable::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            command: vec!["tabula".to_string()],
        }
    }
}

impl EngineConfig {
    pub fn with_epoch_year(mut self, year: i32) -> Self {
        self.epoch_year = year;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_EPOCH_YEAR..=MAX_EPOCH_YEAR).contains(&self.epoch_year) {
            return Err(ConfigError::EpochYearOutOfRange {
                year: self.epoch_year,
                min: MIN_EPOCH_YEAR,
                max: MAX_EPOCH_YEAR,
            });
        }
        self.rules.validate()
    }
}
