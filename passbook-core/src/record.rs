//! Reconstructed transaction records and the canonical column roles

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Semantic role a raw statement column can fulfil
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    #[serde(rename = "date-desc")]
    DateDesc,
    #[serde(rename = "deposit")]
    Deposit,
    #[serde(rename = "withdrawal")]
    Withdrawal,
    #[serde(rename = "balance")]
    Balance,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::DateDesc, Role::Deposit, Role::Withdrawal, Role::Balance];

    /// Roles a table must resolve before any of its rows are read
    pub fn is_required(&self) -> bool {
        matches!(self, Role::DateDesc | Role::Balance)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::DateDesc => "date/description",
            Role::Deposit => "deposit",
            Role::Withdrawal => "withdrawal",
            Role::Balance => "balance",
        }
    }
}

/// One reconstructed statement line.
///
/// Amounts are unsigned as printed on the statement; direction is carried by
/// which of `deposit` / `withdrawal` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    /// Value date inferred by the date sequencer (serialized YYYY-MM-DD)
    pub value_date: NaiveDate,
    pub description: Option<String>,
    pub deposit: Option<Decimal>,
    pub withdrawal: Option<Decimal>,
    /// Running balance after this transaction
    pub balance: Option<Decimal>,
}

impl TransactionRecord {
    pub fn new(value_date: NaiveDate) -> Self {
        Self {
            value_date,
            description: None,
            deposit: None,
            withdrawal: None,
            balance: None,
        }
    }

    /// ISO representation of the value date
    pub fn iso_date(&self) -> String {
        self.value_date.format("%Y-%m-%d").to_string()
    }

    /// True when nothing but the date survived normalization
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.deposit.is_none()
            && self.withdrawal.is_none()
            && self.balance.is_none()
    }
}

/// Where an amount candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// The role's own column
    FromColumn,
    /// Scraped out of the description text; `specificity` is the length of the
    /// longest keyword that gated the scan.
    FromText { specificity: usize },
}

/// A resolved amount together with its provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountToken {
    pub value: Decimal,
    pub provenance: Provenance,
}

impl AmountToken {
    pub fn from_column(value: Decimal) -> Self {
        Self {
            value,
            provenance: Provenance::FromColumn,
        }
    }

    pub fn from_text(value: Decimal, specificity: usize) -> Self {
        Self {
            value,
            provenance: Provenance::FromText { specificity },
        }
    }

    pub fn is_from_column(&self) -> bool {
        self.provenance == Provenance::FromColumn
    }

    /// Whether `self` may replace `existing` on an in-flight record.
    /// Column values are never displaced by text-scraped ones.
    pub fn may_replace(&self, existing: Option<&AmountToken>) -> bool {
        match existing {
            Some(prev) if prev.is_from_column() => self.is_from_column(),
            _ => true,
        }
    }
}
