//! Rule table: every keyword and pattern the reconstruction heuristics use.
//!
//! Column-role substrings, noise markers, amount keywords and boilerplate
//! spans all live here so the resolver, classifier, disambiguator and
//! normalizer read one table instead of carrying private lists. The table is
//! serde-friendly and can be overridden from the config file.
//!
//! Matching conventions:
//! - column labels: lower-cased, trimmed label contains a role substring
//! - keyword sets: case-insensitive substring match on the row text
//! - phrases: case-insensitive, any run of whitespace between words

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::record::Role;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuleTable {
    pub date_desc_columns: Vec<String>,
    pub deposit_columns: Vec<String>,
    pub withdrawal_columns: Vec<String>,
    pub balance_columns: Vec<String>,

    /// Regex a joined data row must match to be promoted to header
    pub header_pattern: String,

    /// Primary noise: rows whose description carries one of these are dropped
    pub boilerplate_markers: Vec<String>,
    /// Secondary noise: a description with one of these does not by itself
    /// make a row a transaction
    pub noise_keywords: Vec<String>,

    pub withdrawal_keywords: Vec<String>,
    pub deposit_keywords: Vec<String>,

    /// Regex for statement-metadata spans removed from descriptions
    pub metadata_span_pattern: String,
    /// Literal phrases removed from descriptions (branch/address lines,
    /// repeated header fragments)
    pub description_boilerplate: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            date_desc_columns: strings(&["date   value description", "date", "value date", "description"]),
            deposit_columns: strings(&["cheque deposit", "deposit", "credit", "deposits"]),
            withdrawal_columns: strings(&["withdrawal", "debit", "payment", "withdrawals"]),
            balance_columns: strings(&["balance", "closing balance", "available balance"]),
            header_pattern: r"(?i)Date.*Value.*Description.*Balance".to_string(),
            boilerplate_markers: strings(&[
                "STATEMENT OF ACCOUNT",
                "ACCOUNT NO",
                "ACCOUNT NUMBER",
                "ACCOUNT NAME",
                "ACCOUNT TYPE",
                "BRANCH",
                "IFSC",
                "ADDRESS",
                "PHONE NO",
            ]),
            noise_keywords: strings(&["CURRENCY", "ACCOUNT", "BRANCH", "DATE"]),
            withdrawal_keywords: strings(&[
                "WITHDRAWAL", "DEBIT", "PAYMENT", "PURCHASE", "PAYTM", "UPI", "NEFT", "RTGS",
            ]),
            deposit_keywords: strings(&[
                "CREDIT", "DEPOSIT", "CHEQUE", "NEFT CREDIT", "RTGS CREDIT", "SALARY", "REFUND",
            ]),
            metadata_span_pattern: concat!(
                r"(?is)(?:statement\s+of\s+account|account\s+(?:name|no|number|type)|customer\s+id)",
                r".*?phone\s+no\.?\s*:?\s*\d+",
            )
            .to_string(),
            description_boilerplate: strings(&[
                "Branch Address",
                "Branch Name",
                "Branch Code",
                "Registered Office Address",
                "Date Value Description",
                "Cheque Deposit Withdrawal Balance",
                "Deposit Withdrawal Balance",
                "Withdrawal Deposit Balance",
            ]),
        }
    }
}

impl RuleTable {
    /// Ordered {substrings, role} pairs used by the column resolver
    pub fn column_rules(&self) -> [(Role, &[String]); 4] {
        [
            (Role::DateDesc, self.date_desc_columns.as_slice()),
            (Role::Deposit, self.deposit_columns.as_slice()),
            (Role::Withdrawal, self.withdrawal_columns.as_slice()),
            (Role::Balance, self.balance_columns.as_slice()),
        ]
    }

    pub fn is_boilerplate(&self, text: &str) -> bool {
        longest_match(text, &self.boilerplate_markers).is_some()
    }

    pub fn is_noise(&self, text: &str) -> bool {
        longest_match(text, &self.noise_keywords).is_some()
    }

    /// Length of the longest withdrawal keyword found in `text`
    pub fn withdrawal_match(&self, text: &str) -> Option<usize> {
        longest_match(text, &self.withdrawal_keywords)
    }

    /// Length of the longest deposit keyword found in `text`
    pub fn deposit_match(&self, text: &str) -> Option<usize> {
        longest_match(text, &self.deposit_keywords)
    }

    pub fn header_regex(&self) -> Result<Regex, ConfigError> {
        Regex::new(&self.header_pattern).map_err(|source| ConfigError::InvalidPattern {
            field: "header_pattern",
            source,
        })
    }

    pub fn metadata_span_regex(&self) -> Result<Regex, ConfigError> {
        Regex::new(&self.metadata_span_pattern).map_err(|source| ConfigError::InvalidPattern {
            field: "metadata_span_pattern",
            source,
        })
    }

    /// One whitespace-tolerant regex per description boilerplate phrase
    pub fn boilerplate_phrase_regexes(&self) -> Result<Vec<Regex>, ConfigError> {
        self.description_boilerplate
            .iter()
            .filter(|p| !p.trim().is_empty())
            .map(|p| {
                phrase_regex(p).map_err(|source| ConfigError::InvalidPattern {
                    field: "description_boilerplate",
                    source,
                })
            })
            .collect()
    }

    /// Compile every pattern once so a bad config fails up front
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.header_regex()?;
        self.metadata_span_regex()?;
        self.boilerplate_phrase_regexes()?;
        if self.date_desc_columns.is_empty() || self.balance_columns.is_empty() {
            return Err(ConfigError::MissingColumnRules);
        }
        Ok(())
    }
}

/// True if a normalized (lower-cased, trimmed) label contains one of the
/// `accepted` substrings. Blank labels and blank substrings never match.
pub fn label_accepts(accepted: &[String], normalized_label: &str) -> bool {
    !normalized_label.is_empty()
        && accepted
            .iter()
            .filter(|a| !a.trim().is_empty())
            .any(|a| normalized_label.contains(a.to_lowercase().as_str()))
}

fn longest_match(text: &str, keywords: &[String]) -> Option<usize> {
    let upper = text.to_uppercase();
    keywords
        .iter()
        .filter(|k| !k.is_empty() && upper.contains(k.to_uppercase().as_str()))
        .map(|k| k.len())
        .max()
}

/// Case-insensitive regex for a literal phrase, tolerant of any whitespace
/// run between its words
pub fn phrase_regex(phrase: &str) -> Result<Regex, regex::Error> {
    let words: Vec<String> = phrase.split_whitespace().map(regex::escape).collect();
    Regex::new(&format!(r"(?i){}", words.join(r"\s+")))
}
