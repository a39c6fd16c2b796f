//! Folds classified rows into transaction records.
//!
//! At most one record is in flight. A new-transaction row closes it and opens
//! the next; continuation rows append description text and may overwrite an
//! amount, but only for roles whose raw cell is present on that row.

use chrono::NaiveDate;
use passbook_core::{AmountToken, DescriptionCleaner, Role, TransactionRecord, format_description};
use rust_decimal::Decimal;

use crate::columns::RowView;
use crate::disambiguate::RowAmounts;

#[derive(Debug, Clone, PartialEq)]
struct PendingRecord {
    value_date: NaiveDate,
    description: Option<String>,
    deposit: Option<AmountToken>,
    withdrawal: Option<AmountToken>,
    balance: Option<AmountToken>,
}

impl PendingRecord {
    fn slot(&mut self, role: Role) -> Option<&mut Option<AmountToken>> {
        match role {
            Role::Deposit => Some(&mut self.deposit),
            Role::Withdrawal => Some(&mut self.withdrawal),
            Role::Balance => Some(&mut self.balance),
            Role::DateDesc => None,
        }
    }

    fn append_text(&mut self, text: &str) {
        match &mut self.description {
            Some(desc) => {
                desc.push(' ');
                desc.push_str(text);
            }
            None => self.description = Some(text.to_string()),
        }
    }

    fn finalize(self, cleaner: &DescriptionCleaner) -> TransactionRecord {
        TransactionRecord {
            value_date: self.value_date,
            description: self
                .description
                .as_deref()
                .and_then(|d| cleaner.clean(d))
                .map(|d| format_description(&d)),
            deposit: self.deposit.map(|t| t.value),
            withdrawal: self.withdrawal.map(|t| t.value),
            balance: self.balance.map(|t| t.value),
        }
    }
}

/// Records out of one document, plus the dates of the ones dropped as empty
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembled {
    pub records: Vec<TransactionRecord>,
    pub pruned: Vec<NaiveDate>,
}

#[derive(Debug, Default)]
pub struct Assembler {
    open: Option<PendingRecord>,
    closed: Vec<PendingRecord>,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_open(&self) -> bool {
        self.open.is_some()
    }

    /// Balance of the in-flight record, if it has one
    pub fn open_balance(&self) -> Option<Decimal> {
        self.open.as_ref().and_then(|r| r.balance).map(|t| t.value)
    }

    /// Close the in-flight record and open a new one from this row.
    pub fn start(&mut self, value_date: NaiveDate, description: Option<&str>, amounts: RowAmounts) {
        if let Some(prev) = self.open.take() {
            self.closed.push(prev);
        }
        self.open = Some(PendingRecord {
            value_date,
            description: description.map(str::to_string),
            deposit: amounts.deposit,
            withdrawal: amounts.withdrawal,
            balance: amounts.balance,
        });
    }

    /// Fold a continuation row into the in-flight record.
    ///
    /// Returns `false` when nothing is open. An amount is overwritten only when
    /// the row has a raw cell for that role, the cell resolved, and the new
    /// value is allowed to displace the old one.
    pub fn continue_with(&mut self, view: &RowView<'_>, amounts: RowAmounts) -> bool {
        let Some(record) = self.open.as_mut() else {
            return false;
        };

        if let Some(text) = view.description {
            record.append_text(text);
        }

        for role in [Role::Deposit, Role::Withdrawal, Role::Balance] {
            if view.cell(role).is_none() {
                continue;
            }
            let Some(token) = amounts.get(role) else {
                continue;
            };
            if let Some(slot) = record.slot(role) {
                if token.may_replace(slot.as_ref()) {
                    *slot = Some(token);
                }
            }
        }
        true
    }

    /// Close everything, clean descriptions, drop empty records and sort by
    /// value date. The sort is stable so same-day records keep row order.
    pub fn finish(mut self, cleaner: &DescriptionCleaner) -> Assembled {
        if let Some(last) = self.open.take() {
            self.closed.push(last);
        }

        let mut out = Assembled::default();
        for pending in self.closed {
            let record = pending.finalize(cleaner);
            if record.is_empty() {
                out.pruned.push(record.value_date);
            } else {
                out.records.push(record);
            }
        }
        out.records.sort_by_key(|r| r.value_date);
        out
    }
}
