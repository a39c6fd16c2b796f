//! passbook-core: value types, normalization, date sequencing and the rule
//! table shared by the statement reconstruction engine.

pub mod config;
pub mod error;
pub mod normalize;
pub mod record;
pub mod rules;
pub mod sequencer;

pub use config::{EngineConfig, ExtractorConfig, MAX_EPOCH_YEAR, MIN_EPOCH_YEAR};
pub use error::{ConfigError, ExtractionError, ParseWarning, ReconstructError, RowRef};
pub use normalize::{
    DescriptionCleaner, clean_amount, clean_date, clean_date_with_year, clean_description,
    format_description,
};
pub use record::{AmountToken, Provenance, Role, TransactionRecord};
pub use rules::{RuleTable, label_accepts};
pub use sequencer::{DEFAULT_EPOCH_YEAR, DateCursor, DateStep, without_date_fragment};
