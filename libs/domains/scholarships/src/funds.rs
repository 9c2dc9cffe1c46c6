//! Numeric reading of free-text funds values.
//!
//! Award amounts are stored as text ("$1,000 - $5,000", "Up to 5k",
//! "Varies"). The range spans the smallest and largest currency amount in
//! the text. Once any amount is marked as money (`$` prefix or `k`/`M`
//! suffix), unmarked numbers such as "for 4 years" are ignored.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// `1,000` | `2500` | `1.5` followed by an optional `k`/`m` multiplier
const AMOUNT: &str =
    r"(?P<whole>\d{1,3}(?:,\d{3})+|\d+)(?:\.(?P<fraction>\d+))?\s*(?P<unit>[kKmM]\b)?";

static AMOUNTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?P<currency>\$)?\s*{AMOUNT}")).unwrap());

static SINGLE_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^\s*\$?\s*{AMOUNT}\s*$")).unwrap());

/// Inclusive amount range read from a funds text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FundsRange {
    pub min: f64,
    pub max: f64,
}

impl FundsRange {
    /// `None` when the text holds no amount.
    pub fn parse(text: &str) -> Option<Self> {
        let amounts: Vec<(f64, bool)> = AMOUNTS
            .captures_iter(text)
            .filter_map(|caps| {
                let marked = caps.name("currency").is_some() || caps.name("unit").is_some();
                amount_from(&caps).map(|amount| (amount, marked))
            })
            .collect();
        let any_marked = amounts.iter().any(|&(_, marked)| marked);

        amounts
            .into_iter()
            .filter(|&(_, marked)| marked || !any_marked)
            .map(|(amount, _)| amount)
            .fold(None, |range, amount| match range {
                None => Some(FundsRange {
                    min: amount,
                    max: amount,
                }),
                Some(FundsRange { min, max }) => Some(FundsRange {
                    min: min.min(amount),
                    max: max.max(amount),
                }),
            })
    }

    /// Overlap test against optional inclusive bounds.
    pub fn overlaps(&self, min_bound: Option<f64>, max_bound: Option<f64>) -> bool {
        min_bound.is_none_or(|min| self.max >= min) && max_bound.is_none_or(|max| self.min <= max)
    }
}

/// Parses a filter bound: exactly one amount, optionally `$`-prefixed.
pub fn parse_amount(text: &str) -> Option<f64> {
    SINGLE_AMOUNT
        .captures(text)
        .and_then(|caps| amount_from(&caps))
}

fn amount_from(caps: &Captures<'_>) -> Option<f64> {
    let whole = caps.name("whole")?.as_str().replace(',', "");
    let number = match caps.name("fraction") {
        Some(fraction) => format!("{whole}.{}", fraction.as_str()),
        None => whole,
    };
    let value: f64 = number.parse().ok()?;

    let multiplier = match caps.name("unit").map(|m| m.as_str()) {
        Some("k" | "K") => 1_000.0,
        Some("m" | "M") => 1_000_000.0,
        _ => 1.0,
    };

    Some(value * multiplier)
}
