//! Resolves the editorial period an episode is filed under.
//!
//! Regular episodes use the publish timestamp shifted forward by two days,
//! unless the title names a different month explicitly. Annual "Best Of"
//! retrospectives are filed under January of the year after their subject
//! year.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Duration, Utc};
use regex::Regex;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Catalog timestamps lag the nominal edition month.
const PUBLISH_BIAS_DAYS: i64 = 2;

static RE_FIRST_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").unwrap());
static RE_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b({})\s+(\d{{4}})", MONTH_NAMES.join("|"))).unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedPeriod {
    pub year: i32,
    /// 1-based month number
    pub month: u32,
    pub is_best_of: bool,
}

impl ResolvedPeriod {
    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }

    /// Year a Best Of episode looks back on.
    pub fn subject_year(&self) -> Option<i32> {
        self.is_best_of.then_some(self.year - 1)
    }

    /// `<year>/<year>-<MM>-<MonthName>[ (Best of <Y>)].txt`
    pub fn relative_path(&self) -> String {
        let suffix = self
            .subject_year()
            .map(|y| format!(" (Best of {y})"))
            .unwrap_or_default();
        format!(
            "{year}/{year}-{month:02}-{name}{suffix}.txt",
            year = self.year,
            month = self.month,
            name = self.month_name(),
        )
    }
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month.clamp(1, 12) - 1) as usize]
}

fn month_number(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .map(|i| i as u32 + 1)
}

pub fn is_best_of(title: &str) -> bool {
    title.to_lowercase().contains("best of")
}

/// `(year, month)` of the first "<MonthName> <YYYY>" mention in a title.
fn month_year_in_title(title: &str) -> Option<(i32, u32)> {
    let caps = RE_MONTH_YEAR.captures(title)?;
    let month = month_number(&caps[1])?;
    let year = caps[2].parse().ok()?;
    Some((year, month))
}

pub fn resolve(title: &str, created_at: DateTime<Utc>) -> ResolvedPeriod {
    if is_best_of(title) {
        let subject_year = RE_FIRST_YEAR
            .find(title)
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .unwrap_or_else(|| created_at.year());
        return ResolvedPeriod {
            year: subject_year + 1,
            month: 1,
            is_best_of: true,
        };
    }

    let biased = created_at + Duration::days(PUBLISH_BIAS_DAYS);
    match month_year_in_title(title) {
        Some((year, month)) if month != biased.month() => ResolvedPeriod {
            year,
            month,
            is_best_of: false,
        },
        _ => ResolvedPeriod {
            year: biased.year(),
            month: biased.month(),
            is_best_of: false,
        },
    }
}
