//! Search constraints and how each one is evaluated.
//!
//! Structured filters are resolved through a fixed dispatch table: every
//! [`ConstraintKind`] knows how to read itself from [`SearchFilters`] and
//! whether it is evaluated by the store or against fetched records.

use strum::Display;

use crate::error::{ScholarshipError, ScholarshipResult};
use crate::funds::{FundsRange, parse_amount};
use crate::models::{Scholarship, SearchFilters};

/// Where a constraint is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Translated into a store query filter
    Store,
    /// Checked against each fetched record
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ConstraintKind {
    LevelOfStudy,
    AwardType,
    MinFunds,
    MaxFunds,
}

/// Resolution order of structured constraints.
pub const DISPATCH_TABLE: [ConstraintKind; 4] = [
    ConstraintKind::LevelOfStudy,
    ConstraintKind::AwardType,
    ConstraintKind::MinFunds,
    ConstraintKind::MaxFunds,
];

impl ConstraintKind {
    pub fn placement(self) -> Placement {
        match self {
            ConstraintKind::LevelOfStudy | ConstraintKind::AwardType => Placement::Store,
            ConstraintKind::MinFunds | ConstraintKind::MaxFunds => Placement::Local,
        }
    }

    /// Reads this constraint from `filters`; blank values impose nothing.
    fn extract(self, filters: &SearchFilters) -> ScholarshipResult<Option<Constraint>> {
        let raw = match self {
            ConstraintKind::LevelOfStudy => filters.level_of_study.as_deref(),
            ConstraintKind::AwardType => filters.award_type.as_deref(),
            ConstraintKind::MinFunds => filters.min_funds.as_deref(),
            ConstraintKind::MaxFunds => filters.max_funds.as_deref(),
        };
        let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(None);
        };

        let constraint = match self {
            ConstraintKind::LevelOfStudy => Constraint::LevelOfStudy(value.to_string()),
            ConstraintKind::AwardType => Constraint::AwardType(value.to_string()),
            ConstraintKind::MinFunds => Constraint::MinFunds(funds_bound(self, value)?),
            ConstraintKind::MaxFunds => Constraint::MaxFunds(funds_bound(self, value)?),
        };
        Ok(Some(constraint))
    }
}

fn funds_bound(kind: ConstraintKind, value: &str) -> ScholarshipResult<f64> {
    parse_amount(value).ok_or_else(|| {
        ScholarshipError::Validation(format!(
            "{} must be an amount such as 1000, $2,500 or 5k, got '{}'",
            kind, value
        ))
    })
}

/// A single structured search constraint
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// `level_of_study` contains the label
    LevelOfStudy(String),
    /// `award_type` equals the label
    AwardType(String),
    /// Funds range reaches at least this amount
    MinFunds(f64),
    /// Funds range starts at or below this amount
    MaxFunds(f64),
}

impl Constraint {
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::LevelOfStudy(_) => ConstraintKind::LevelOfStudy,
            Constraint::AwardType(_) => ConstraintKind::AwardType,
            Constraint::MinFunds(_) => ConstraintKind::MinFunds,
            Constraint::MaxFunds(_) => ConstraintKind::MaxFunds,
        }
    }

    pub fn placement(&self) -> Placement {
        self.kind().placement()
    }

    /// The store-side filter, for constraints placed in the store.
    pub fn store_filter(&self) -> Option<StoreFilter> {
        match self {
            Constraint::LevelOfStudy(level) => {
                Some(StoreFilter::LevelOfStudyContains(level.clone()))
            }
            Constraint::AwardType(award_type) => {
                Some(StoreFilter::AwardTypeEquals(award_type.clone()))
            }
            Constraint::MinFunds(_) | Constraint::MaxFunds(_) => None,
        }
    }

    /// Evaluates the constraint against one record.
    ///
    /// Records whose funds text holds no amount never satisfy a funds bound.
    pub fn matches(&self, scholarship: &Scholarship) -> bool {
        match self {
            Constraint::LevelOfStudy(level) => {
                scholarship.level_of_study.iter().any(|l| l == level)
            }
            Constraint::AwardType(award_type) => {
                scholarship.award_type.as_deref() == Some(award_type.as_str())
            }
            Constraint::MinFunds(min) => {
                funds_of(scholarship).is_some_and(|r| r.overlaps(Some(*min), None))
            }
            Constraint::MaxFunds(max) => {
                funds_of(scholarship).is_some_and(|r| r.overlaps(None, Some(*max)))
            }
        }
    }
}

fn funds_of(scholarship: &Scholarship) -> Option<FundsRange> {
    scholarship.funds.as_deref().and_then(FundsRange::parse)
}

/// Resolves `filters` through [`DISPATCH_TABLE`].
///
/// Fails with a validation error when a funds bound is not an amount.
pub fn constraints_from(filters: &SearchFilters) -> ScholarshipResult<Vec<Constraint>> {
    let mut constraints = Vec::new();
    for kind in DISPATCH_TABLE {
        if let Some(constraint) = kind.extract(filters)? {
            constraints.push(constraint);
        }
    }
    Ok(constraints)
}

/// A filter the store evaluates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreFilter {
    LevelOfStudyContains(String),
    AwardTypeEquals(String),
    /// Case-insensitive substring of `award_name`
    AwardNameContains(String),
}

/// Filters sent with one store read; empty means the whole table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreQuery {
    pub filters: Vec<StoreFilter>,
}

impl StoreQuery {
    pub fn new(filters: Vec<StoreFilter>) -> Self {
        Self { filters }
    }

    /// Whether `scholarship` passes every filter.
    pub fn matches(&self, scholarship: &Scholarship) -> bool {
        self.filters.iter().all(|filter| match filter {
            StoreFilter::LevelOfStudyContains(level) => {
                scholarship.level_of_study.iter().any(|l| l == level)
            }
            StoreFilter::AwardTypeEquals(award_type) => {
                scholarship.award_type.as_deref() == Some(award_type.as_str())
            }
            StoreFilter::AwardNameContains(term) => scholarship
                .award_name
                .to_lowercase()
                .contains(&term.to_lowercase()),
        })
    }
}

/// How a free-text term is matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum TextStrategy {
    /// `award_name ILIKE %term%`, evaluated by the store
    AwardName,
    /// Substring of [`searchable_text`], evaluated locally
    AllFields,
}

impl TextStrategy {
    /// All-fields matching applies whenever a structured constraint is present.
    pub fn for_constraints(constraints: &[Constraint]) -> Self {
        if constraints.is_empty() {
            TextStrategy::AwardName
        } else {
            TextStrategy::AllFields
        }
    }
}

/// Lower-cased text that all-fields matching searches.
pub fn searchable_text(scholarship: &Scholarship) -> String {
    [
        Some(scholarship.award_name.as_str()),
        scholarship.organization.as_deref(),
        scholarship.purpose.as_deref(),
        scholarship.focus.as_deref(),
        scholarship.qualifications.as_deref(),
        scholarship.criteria.as_deref(),
    ]
    .into_iter()
    .map(|field| field.unwrap_or_default())
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

/// Trimmed term, or `None` when blank.
pub fn normalize_term(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
