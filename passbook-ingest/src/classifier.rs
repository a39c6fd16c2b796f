//! Row classification: new transaction, continuation, or noise.
//!
//! Decision order:
//! 1. description carries a boilerplate marker -> noise, whatever else the row has
//! 2. row has an amount cell, or a description free of secondary noise
//!    keywords, and a date was extracted -> new transaction
//! 3. a transaction is open -> continuation
//! 4. otherwise noise
//!
//! Without a date a row can only ever continue an open transaction.

use chrono::NaiveDate;
use passbook_core::RuleTable;

use crate::columns::RowView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseReason {
    /// Statement banner, account/branch/IFSC/address/phone lines
    Boilerplate,
    /// Nothing to start and nothing open to continue
    NoOpenRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    NewTransaction,
    Continuation,
    Noise(NoiseReason),
}

/// Step 1 on its own, so callers can drop banner rows before they touch the
/// date cursor
pub fn is_boilerplate_row(view: &RowView<'_>, rules: &RuleTable) -> bool {
    view.description.is_some_and(|d| rules.is_boilerplate(d))
}

pub fn classify(
    view: &RowView<'_>,
    date: Option<NaiveDate>,
    has_open_record: bool,
    rules: &RuleTable,
) -> RowKind {
    if is_boilerplate_row(view, rules) {
        return RowKind::Noise(NoiseReason::Boilerplate);
    }

    let meaningful_text = view.description.is_some_and(|d| !rules.is_noise(d));
    let has_data = view.has_amount_cell() || meaningful_text;

    if has_data && date.is_some() {
        RowKind::NewTransaction
    } else if has_open_record {
        RowKind::Continuation
    } else {
        RowKind::Noise(NoiseReason::NoOpenRecord)
    }
}
