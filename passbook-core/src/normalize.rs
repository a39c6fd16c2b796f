//! Value normalization for noisy extracted cells.
//!
//! Nothing in here fails: unparseable input degrades to `None`.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::ConfigError;
use crate::rules::RuleTable;

/// Parse an amount such as `"1,234.56"`, `"INR 500.00"` or `"-500"`.
///
/// Everything but digits, `.` and `-` is dropped. A leading minus negates the
/// remainder; any other stray minus makes the value malformed.
pub fn clean_amount(raw: &str) -> Option<Decimal> {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let (negative, digits) = match kept.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, kept.as_str()),
    };

    if !digits.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let value = Decimal::from_str(digits).ok()?;
    Some(if negative { -value } else { value })
}

fn dd_mm_yyyy_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{2})[/-](\d{2})[/-](\d{4})").expect("dd/mm/yyyy regex"))
}

fn dd_mm_yy_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{2})[/-](\d{2})[/-](\d{2})").expect("dd/mm/yy regex"))
}

fn mon_dd_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b([A-Za-z]{3})\s+(\d{1,2})\b(?:\s+(\d{4}))?").expect("mon dd regex")
    })
}

fn dd_mon_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(\d{1,2})\s+([A-Za-z]{3})\b(?:\s+(\d{4}))?").expect("dd mon regex")
    })
}

/// Month number for a month name; only the first three letters count.
pub fn month_from_name(name: &str) -> Option<u32> {
    let abbrev: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match abbrev.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// `%y` pivot: 00-68 is 20xx, 69-99 is 19xx
fn expand_two_digit_year(yy: i32) -> i32 {
    if yy < 69 { 2000 + yy } else { 1900 + yy }
}

/// Parse a date with the current system year filling in missing years.
pub fn clean_date(raw: &str) -> Option<NaiveDate> {
    clean_date_with_year(raw, Local::now().year())
}

/// Parse a date, trying DD/MM/YYYY, DD/MM/YY, "Mon DD[ YYYY]" and
/// "DD Mon[ YYYY]" in that order. `default_year` fills in a missing year.
/// A match that is not a real calendar date falls through to the next form.
pub fn clean_date_with_year(raw: &str, default_year: i32) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = dd_mm_yyyy_re().captures(s) {
        let d = caps[1].parse().ok()?;
        let m = caps[2].parse().ok()?;
        let y = caps[3].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
            return Some(date);
        }
    }

    if let Some(caps) = dd_mm_yy_re().captures(s) {
        let d = caps[1].parse().ok()?;
        let m = caps[2].parse().ok()?;
        let yy: i32 = caps[3].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(expand_two_digit_year(yy), m, d) {
            return Some(date);
        }
    }

    if let Some(caps) = mon_dd_re().captures(s) {
        let year = caps.get(3).and_then(|y| y.as_str().parse().ok()).unwrap_or(default_year);
        let day = caps[2].parse().ok();
        if let (Some(month), Some(day)) = (month_from_name(&caps[1]), day) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        }
    }

    if let Some(caps) = dd_mon_re().captures(s) {
        let year = caps.get(3).and_then(|y| y.as_str().parse().ok()).unwrap_or(default_year);
        let day = caps[1].parse().ok();
        if let (Some(month), Some(day)) = (month_from_name(&caps[2]), day) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        }
    }

    None
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"))
}

/// Strips statement boilerplate out of description text.
///
/// Built from a `RuleTable` so the spans it removes are configurable.
#[derive(Debug, Clone)]
pub struct DescriptionCleaner {
    metadata_span: Regex,
    phrases: Vec<Regex>,
}

impl DescriptionCleaner {
    pub fn new(rules: &RuleTable) -> Result<Self, ConfigError> {
        Ok(Self {
            metadata_span: rules.metadata_span_regex()?,
            phrases: rules.boilerplate_phrase_regexes()?,
        })
    }

    /// Remove metadata spans and boilerplate phrases, collapse whitespace.
    pub fn clean(&self, raw: &str) -> Option<String> {
        let mut text = self.metadata_span.replace_all(raw, " ").into_owned();
        for phrase in &self.phrases {
            text = phrase.replace_all(&text, " ").into_owned();
        }
        let collapsed = whitespace_re().replace_all(&text, " ");
        let trimmed = collapsed.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

fn default_cleaner() -> &'static DescriptionCleaner {
    static CLEANER: OnceLock<DescriptionCleaner> = OnceLock::new();
    CLEANER.get_or_init(|| {
        DescriptionCleaner::new(&RuleTable::default()).expect("default rule table compiles")
    })
}

/// Clean a description with the default rule table.
pub fn clean_description(raw: &str) -> Option<String> {
    default_cleaner().clean(raw)
}

/// Reformat payment-network descriptions.
///
/// `"UPI/merchant/ref123"` becomes `"UPI (merchant) - ref123"`. Anything with
/// fewer than three `/` segments is returned unchanged; empty segments are
/// left out together with their punctuation.
pub fn format_description(desc: &str) -> String {
    let desc = desc.trim();
    let parts: Vec<&str> = desc.split('/').map(str::trim).collect();
    if parts.len() < 3 {
        return desc.to_string();
    }

    let recipient = parts[0];
    let network_id = parts[1];
    let reference = parts[parts.len() - 1];

    let mut formatted = recipient.to_string();
    if !network_id.is_empty() {
        if !formatted.is_empty() {
            formatted.push(' ');
        }
        formatted.push_str(&format!("({network_id})"));
    }
    if !reference.is_empty() {
        if !formatted.is_empty() {
            formatted.push(' ');
        }
        formatted.push_str(&format!("- {reference}"));
    }
    formatted
}
