//! Amount disambiguation.
//!
//! Extracted tables often shift the withdrawal/deposit/balance columns so the
//! running balance shows up twice. Contract, per role:
//! 1. the role's own column, if it cleans to a positive amount that differs
//!    from the balance
//! 2. otherwise, if the row text carries one of the role's keywords, the first
//!    positive number in the text that differs from the balance
//!    (comma-grouped numbers first, then plain decimals, then integers)
//! 3. otherwise nothing

use std::ops::Range;
use std::sync::OnceLock;

use passbook_core::{AmountToken, Provenance, Role, RuleTable, clean_amount};
use regex::Regex;
use rust_decimal::Decimal;

use crate::columns::RowView;

fn grouped_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // 1,234.56 and lakh-style 2,00,000.00
    RE.get_or_init(|| Regex::new(r"\d{1,3}(?:,\d{2,3})+(?:\.\d+)?").expect("grouped amount regex"))
}

fn decimal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\.\d+").expect("decimal amount regex"))
}

fn integer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("integer amount regex"))
}

/// Numbers found in free text, in preference order.
///
/// Each pass only reads text no earlier pass has claimed, so `1,250.50` is
/// one candidate and never also `250.50`, `250` or `50`.
pub fn amount_candidates(text: &str) -> Vec<Decimal> {
    let mut taken: Vec<Range<usize>> = Vec::new();
    let mut candidates = Vec::new();

    for re in [grouped_re(), decimal_re(), integer_re()] {
        for m in re.find_iter(text) {
            if taken.iter().any(|r| m.start() < r.end && r.start < m.end()) {
                continue;
            }
            taken.push(m.range());
            if let Some(value) = clean_amount(m.as_str()) {
                candidates.push(value);
            }
        }
    }
    candidates
}

fn resolve(
    row_text: &str,
    column_value: Option<&str>,
    balance: Option<Decimal>,
    keyword: Option<usize>,
) -> Option<AmountToken> {
    if let Some(value) = column_value.and_then(clean_amount) {
        if value > Decimal::ZERO && balance != Some(value) {
            return Some(AmountToken::from_column(value));
        }
    }

    let specificity = keyword?;
    amount_candidates(row_text)
        .into_iter()
        .find(|c| *c > Decimal::ZERO && balance != Some(*c))
        .map(|value| AmountToken::from_text(value, specificity))
}

pub fn resolve_withdrawal(
    row_text: &str,
    column_value: Option<&str>,
    balance: Option<Decimal>,
    rules: &RuleTable,
) -> Option<AmountToken> {
    resolve(row_text, column_value, balance, rules.withdrawal_match(row_text))
}

pub fn resolve_deposit(
    row_text: &str,
    column_value: Option<&str>,
    balance: Option<Decimal>,
    rules: &RuleTable,
) -> Option<AmountToken> {
    resolve(row_text, column_value, balance, rules.deposit_match(row_text))
}

/// Resolved amounts of one row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowAmounts {
    pub deposit: Option<AmountToken>,
    pub withdrawal: Option<AmountToken>,
    pub balance: Option<AmountToken>,
}

impl RowAmounts {
    pub fn get(&self, role: Role) -> Option<AmountToken> {
        match role {
            Role::Deposit => self.deposit,
            Role::Withdrawal => self.withdrawal,
            Role::Balance => self.balance,
            Role::DateDesc => None,
        }
    }
}

/// Resolve all three amount roles of a row.
///
/// `amount_text` is the row text to scan (description without its date).
/// `fallback_balance` stands in when the row has no balance of its own.
/// If both withdrawal and deposit were scraped from text and landed on the
/// same number, the side with the longer matching keyword keeps it
/// ("NEFT CREDIT" beats "NEFT"); withdrawal keeps it on a tie.
pub fn resolve_row(
    view: &RowView<'_>,
    amount_text: &str,
    fallback_balance: Option<Decimal>,
    rules: &RuleTable,
) -> RowAmounts {
    let balance = view.balance.and_then(clean_amount).map(AmountToken::from_column);
    let reference = balance.map(|b| b.value).or(fallback_balance);

    let mut withdrawal = resolve_withdrawal(amount_text, view.withdrawal, reference, rules);
    let mut deposit = resolve_deposit(amount_text, view.deposit, reference, rules);

    if let (Some(w), Some(d)) = (withdrawal, deposit) {
        if let (
            Provenance::FromText { specificity: ws },
            Provenance::FromText { specificity: ds },
        ) = (w.provenance, d.provenance)
        {
            if w.value == d.value {
                if ds > ws {
                    withdrawal = None;
                } else {
                    deposit = None;
                }
            }
        }
    }

    RowAmounts {
        deposit,
        withdrawal,
        balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_column_value_wins() {
        let rules = RuleTable::default();
        let token = resolve_withdrawal("UPI 99.00", Some("1,500"), Some(dec("8500")), &rules).unwrap();
        assert_eq!(token, AmountToken::from_column(dec("1500")));
    }

    #[test]
    fn test_column_equal_to_balance_rejected() {
        let rules = RuleTable::default();
        assert_eq!(resolve_withdrawal("shop", Some("8,500.00"), Some(dec("8500")), &rules), None);
        // with a keyword the text is scanned instead
        let token =
            resolve_withdrawal("UPI shop 1,200.00", Some("8,500.00"), Some(dec("8500")), &rules).unwrap();
        assert_eq!(token.value, dec("1200.00"));
        assert!(!token.is_from_column());
    }

    #[test]
    fn test_non_positive_column_falls_through() {
        let rules = RuleTable::default();
        assert_eq!(resolve_withdrawal("shop", Some("-500"), None, &rules), None);
        assert_eq!(resolve_withdrawal("shop", Some("0.00"), None, &rules), None);
        let token = resolve_withdrawal("PURCHASE 42.50", Some("-500"), None, &rules).unwrap();
        assert_eq!(token.value, dec("42.50"));
    }

    #[test]
    fn test_text_scan_preference_order() {
        assert_eq!(
            amount_candidates("ref 12 paid 1,250.50 fee 99.5"),
            vec![dec("1250.50"), dec("99.5"), dec("12")]
        );
        let rules = RuleTable::default();
        let token = resolve_withdrawal("NEFT ref 12 paid 1,250.50", None, None, &rules).unwrap();
        assert_eq!(token.value, dec("1250.50"));
    }

    #[test]
    fn test_text_scan_skips_balance() {
        let rules = RuleTable::default();
        let token =
            resolve_withdrawal("UPI 8,500.00 then 1,200.00", None, Some(dec("8500")), &rules).unwrap();
        assert_eq!(token.value, dec("1200.00"));
    }

    #[test]
    fn test_text_scan_never_splits_grouped_number() {
        assert_eq!(amount_candidates("UPI transfer 8,500.00"), vec![dec("8500.00")]);
        assert_eq!(amount_candidates("ref 2,00,000 and 7"), vec![dec("200000"), dec("7")]);

        let rules = RuleTable::default();
        // the only number in the text is the balance itself
        assert_eq!(
            resolve_withdrawal("UPI transfer 8,500.00", None, Some(dec("8500.00")), &rules),
            None
        );
        assert_eq!(
            resolve_deposit("CREDIT 45.10 bal 8,500.00", None, Some(dec("8500")), &rules),
            Some(AmountToken::from_text(dec("45.10"), 6))
        );
    }

    #[test]
    fn test_no_keyword_no_scan() {
        let rules = RuleTable::default();
        assert_eq!(resolve_withdrawal("grocery 1,234.00", None, None, &rules), None);
        assert_eq!(resolve_deposit("grocery 1,234.00", None, None, &rules), None);
    }

    #[test]
    fn test_deposit_symmetric() {
        let rules = RuleTable::default();
        let token = resolve_deposit("SALARY ACME 45,000.00", None, None, &rules).unwrap();
        assert_eq!(token, AmountToken::from_text(dec("45000.00"), 6));
        let token = resolve_deposit("anything", Some("300"), None, &rules).unwrap();
        assert_eq!(token, AmountToken::from_column(dec("300")));
    }

    #[test]
    fn test_resolve_row_specific_keyword_wins_conflict() {
        let rules = RuleTable::default();
        let view = RowView {
            description: Some("Jan 07 NEFT CREDIT ACME 25,000.00"),
            ..RowView::default()
        };
        let amounts = resolve_row(&view, "NEFT CREDIT ACME 25,000.00", None, &rules);
        assert_eq!(amounts.withdrawal, None);
        assert_eq!(amounts.deposit.unwrap().value, dec("25000.00"));
        assert_eq!(amounts.balance, None);
    }

    #[test]
    fn test_resolve_row_uses_fallback_balance() {
        let rules = RuleTable::default();
        let view = RowView {
            description: Some("more text"),
            withdrawal: Some("8,500"),
            ..RowView::default()
        };
        let amounts = resolve_row(&view, "more text", Some(dec("8500")), &rules);
        assert_eq!(amounts.withdrawal, None);

        let amounts = resolve_row(&view, "more text", Some(dec("9000")), &rules);
        assert_eq!(amounts.get(Role::Withdrawal).unwrap().value, dec("8500"));
    }

    #[test]
    fn test_resolve_row_balance_from_column() {
        let rules = RuleTable::default();
        let view = RowView {
            description: Some("Jan 05 UPI/merchant/ref123"),
            withdrawal: Some("1500"),
            balance: Some("8500"),
            ..RowView::default()
        };
        let amounts = resolve_row(&view, "UPI/merchant/ref123", None, &rules);
        assert_eq!(amounts.withdrawal, Some(AmountToken::from_column(dec("1500"))));
        assert_eq!(amounts.balance, Some(AmountToken::from_column(dec("8500"))));
        assert_eq!(amounts.deposit, None);
    }
}
