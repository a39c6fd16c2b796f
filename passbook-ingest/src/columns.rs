//! Column resolution: which raw column plays which role.
//!
//! Labels are lower-cased and trimmed, then each role takes the first column
//! (scan order) containing one of its accepted substrings. Roles are resolved
//! independently. A table must resolve the date/description and balance
//! roles or it is skipped.
//!
//! When the extractor's header hint is unusable the real header is often a
//! data row further down (statement banners come first). `locate_header`
//! looks for that row.

use std::collections::BTreeMap;

use passbook_core::{Role, RuleTable, label_accepts};
use regex::Regex;

use crate::types::{RawRow, RawTable};

/// A raw column chosen for a role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub index: usize,
    pub label: String,
}

/// Role -> column mapping for one table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: BTreeMap<Role, Column>,
}

impl ColumnMap {
    pub fn get(&self, role: Role) -> Option<&Column> {
        self.columns.get(&role)
    }

    pub fn index(&self, role: Role) -> Option<usize> {
        self.get(role).map(|c| c.index)
    }

    pub fn has(&self, role: Role) -> bool {
        self.columns.contains_key(&role)
    }

    /// Required roles this map lacks
    pub fn missing_required(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|r| r.is_required() && !self.has(*r))
            .collect()
    }

    /// Cell for `role` in `row`, if the role is mapped and the cell present
    pub fn cell<'a>(&self, row: &RawRow<'a>, role: Role) -> Option<&'a str> {
        self.index(role).and_then(|i| row.get(i))
    }

    pub fn view<'a>(&self, row: &RawRow<'a>) -> RowView<'a> {
        RowView {
            description: self.cell(row, Role::DateDesc),
            deposit: self.cell(row, Role::Deposit),
            withdrawal: self.cell(row, Role::Withdrawal),
            balance: self.cell(row, Role::Balance),
        }
    }
}

/// The four role cells of one row, already trimmed; `None` means not present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowView<'a> {
    pub description: Option<&'a str>,
    pub deposit: Option<&'a str>,
    pub withdrawal: Option<&'a str>,
    pub balance: Option<&'a str>,
}

impl<'a> RowView<'a> {
    pub fn cell(&self, role: Role) -> Option<&'a str> {
        match role {
            Role::DateDesc => self.description,
            Role::Deposit => self.deposit,
            Role::Withdrawal => self.withdrawal,
            Role::Balance => self.balance,
        }
    }

    pub fn has_amount_cell(&self) -> bool {
        self.deposit.is_some() || self.withdrawal.is_some() || self.balance.is_some()
    }
}

/// Map every role the labels can fill. Deterministic in its inputs.
pub fn map_columns(labels: &[String], rules: &RuleTable) -> ColumnMap {
    let normalized: Vec<String> = labels.iter().map(|l| l.trim().to_lowercase()).collect();

    let mut columns = BTreeMap::new();
    for (role, accepted) in rules.column_rules() {
        let found = normalized.iter().position(|label| label_accepts(accepted, label));
        if let Some(index) = found {
            columns.insert(
                role,
                Column {
                    index,
                    label: labels[index].clone(),
                },
            );
        }
    }

    ColumnMap { columns }
}

/// Map the labels and insist on the required roles.
///
/// `Err` carries the required roles that did not resolve.
pub fn resolve_columns(labels: &[String], rules: &RuleTable) -> Result<ColumnMap, Vec<Role>> {
    let map = map_columns(labels, rules);
    let missing = map.missing_required();
    if missing.is_empty() { Ok(map) } else { Err(missing) }
}

/// A table whose header has been found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTable {
    pub columns: ColumnMap,
    /// Index of the first data row
    pub data_start: usize,
    /// Row promoted to header, `None` when the extractor's hint was used
    pub header_row: Option<usize>,
}

/// Resolve a table's columns from its header hint, or failing that from the
/// first row that matches `header_re` and resolves the required roles.
///
/// `Err` carries the roles the header hint was missing.
pub fn locate_header(
    table: &RawTable,
    rules: &RuleTable,
    header_re: &Regex,
) -> Result<ResolvedTable, Vec<Role>> {
    let hint_missing = match resolve_columns(&table.header, rules) {
        Ok(columns) => {
            return Ok(ResolvedTable {
                columns,
                data_start: 0,
                header_row: None,
            });
        }
        Err(missing) => missing,
    };

    for (i, row) in table.iter_rows().enumerate() {
        if !header_re.is_match(&row.joined()) {
            continue;
        }
        if let Ok(columns) = resolve_columns(&row.labels(), rules) {
            return Ok(ResolvedTable {
                columns,
                data_start: i + 1,
                header_row: Some(i),
            });
        }
    }

    Err(hint_missing)
}
