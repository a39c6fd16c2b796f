//! Date sequencer: absolute dates from "Mon DD" fragments.
//!
//! Statement rows only print month and day. The cursor remembers the last
//! (month, day) it saw and bumps the year whenever a new pair sorts before the
//! previous one, which is how a statement crossing New Year reads
//! top-to-bottom.
//!
//! The cursor is plain state owned by one document run. Create a fresh one per
//! document; nothing here is global.

use std::borrow::Cow;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::normalize::month_from_name;

/// Year assumed for the first row of a statement when none is configured
pub const DEFAULT_EPOCH_YEAR: i32 = 2024;

fn month_day_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([A-Za-z]{3})\s+(\d{1,2})(?:st|nd|rd|th)?\b").expect("month day regex"))
}

/// Outcome of feeding one row's text to the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateStep {
    /// No month/day fragment in the text; cursor untouched
    Absent,
    /// A month was recognised but the day does not make a calendar date
    Unresolvable { fragment: String },
    Resolved(NaiveDate),
}

impl DateStep {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DateStep::Resolved(d) => Some(*d),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateCursor {
    last: Option<(u32, u32)>,
    year: i32,
}

impl Default for DateCursor {
    fn default() -> Self {
        Self::new(DEFAULT_EPOCH_YEAR)
    }
}

impl DateCursor {
    pub fn new(epoch_year: i32) -> Self {
        Self {
            last: None,
            year: epoch_year,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Resolve the first "Mon DD" fragment in `text` to a date.
    pub fn advance(&mut self, text: &str) -> Option<NaiveDate> {
        self.step(text).date()
    }

    /// Like [`DateCursor::advance`] but reports why no date came out.
    ///
    /// Unknown month names and out-of-range days (0, >31) leave the cursor
    /// untouched. A day in 1..=31 that does not exist in its month (Feb 30)
    /// still moves the cursor, then reports `Unresolvable`.
    pub fn step(&mut self, text: &str) -> DateStep {
        let Some(caps) = month_day_re().captures(text) else {
            return DateStep::Absent;
        };

        let Some(month) = month_from_name(&caps[1]) else {
            return DateStep::Absent;
        };

        let fragment = caps[0].to_string();
        let day: u32 = match caps[2].parse() {
            Ok(d) if (1..=31).contains(&d) => d,
            _ => return DateStep::Unresolvable { fragment },
        };

        if let Some(prev) = self.last {
            if (month, day) < prev {
                self.year = self.year.saturating_add(1);
            }
        }
        self.last = Some((month, day));

        match NaiveDate::from_ymd_opt(self.year, month, day) {
            Some(date) => DateStep::Resolved(date),
            None => DateStep::Unresolvable { fragment },
        }
    }
}

/// `text` with its first "Mon DD" date fragment cut out, so the day number
/// is not mistaken for an amount. Text without a real month fragment is
/// returned as is.
pub fn without_date_fragment(text: &str) -> Cow<'_, str> {
    let Some(caps) = month_day_re().captures(text) else {
        return Cow::Borrowed(text);
    };
    if month_from_name(&caps[1]).is_none() {
        return Cow::Borrowed(text);
    }
    let Some(m) = caps.get(0) else {
        return Cow::Borrowed(text);
    };
    Cow::Owned(format!("{} {}", &text[..m.start()], &text[m.end()..]).trim().to_string())
}
