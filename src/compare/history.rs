//! Comparison of one benchmark across stored suite runs.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CompareError, ValidationError, Violation};
use crate::report::Report;

use super::comparison::{compare, Comparison};
use super::validate::{check_value, validate_sets};

/// One persisted suite run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSet {
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Reports of the run, in execution order.
    pub reports: Vec<Report>,
}

impl ReportSet {
    /// Wrap reports, stamped with the latest report's creation time.
    pub fn new(reports: Vec<Report>) -> Self {
        let created_at = reports.iter().map(|r| r.created_at).max().unwrap_or(0);
        Self { created_at, reports }
    }

    /// First report named `name`.
    pub fn get(&self, name: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.name == name)
    }

    /// Parse one stored set.
    ///
    /// Field presence and ranges are checked over the raw JSON first, so a
    /// malformed file yields every problem at once.
    ///
    /// # Errors
    ///
    /// `ValidationError` if the text is not JSON or any field is missing or
    /// out of range.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_str(json).map_err(|e| ValidationError {
            violations: vec![Violation {
                index: 0,
                report: None,
                field: "<root>".to_string(),
                problem: format!("invalid JSON: {}", e),
            }],
        })?;
        Self::from_value(0, value)
    }

    /// Parse a set already decoded to a JSON value; `index` labels violations.
    ///
    /// # Errors
    ///
    /// `ValidationError` if any field is missing or out of range.
    pub fn from_value(index: usize, value: Value) -> Result<Self, ValidationError> {
        let violations = check_value(index, &value);
        if !violations.is_empty() {
            return Err(ValidationError { violations });
        }
        serde_json::from_value(value).map_err(|e| ValidationError {
            violations: vec![Violation {
                index,
                report: None,
                field: "<root>".to_string(),
                problem: e.to_string(),
            }],
        })
    }

    /// Parse many stored sets, collecting violations across all of them.
    ///
    /// # Errors
    ///
    /// `ValidationError` listing every violation in every set.
    pub fn from_values(values: Vec<Value>) -> Result<Vec<Self>, ValidationError> {
        let mut sets = Vec::with_capacity(values.len());
        let mut violations = Vec::new();
        for (index, value) in values.into_iter().enumerate() {
            match Self::from_value(index, value) {
                Ok(set) => sets.push(set),
                Err(e) => violations.extend(e.violations),
            }
        }
        if violations.is_empty() {
            Ok(sets)
        } else {
            Err(ValidationError { violations })
        }
    }
}

type FilterFn<'f> = Box<dyn Fn(&Report) -> bool + 'f>;
type SortFn<'f> = Box<dyn Fn(&Report, &Report) -> Ordering + 'f>;

/// Selection and ordering of history matches.
///
/// Without a sort function, matches keep the order of the supplied sets.
#[derive(Default)]
pub struct HistoryOptions<'f> {
    filter: Option<FilterFn<'f>>,
    sort: Option<SortFn<'f>>,
}

impl fmt::Debug for HistoryOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryOptions")
            .field("filter", &self.filter.is_some())
            .field("sort", &self.sort.is_some())
            .finish()
    }
}

impl<'f> HistoryOptions<'f> {
    /// Keep every match in input order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only matches for which `filter` returns true.
    pub fn filter(mut self, filter: impl Fn(&Report) -> bool + 'f) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Order matches with `sort` (stable) after filtering.
    pub fn sort(mut self, sort: impl Fn(&Report, &Report) -> Ordering + 'f) -> Self {
        self.sort = Some(Box::new(sort));
        self
    }

    /// Order matches oldest first.
    pub fn oldest_first(self) -> Self {
        self.sort(|a, b| a.created_at.cmp(&b.created_at))
    }
}

/// Compare every pair of reports named `name` across `sets`.
///
/// All sets are validated first. The first report named `name` is taken
/// from each set, then filtered and sorted per `options`. With `k` matches
/// the result holds the `k·(k-1)/2` comparisons `(i, j)` for `i < j`, in
/// that order.
///
/// # Errors
///
/// - `Validation` if any report in any set is malformed.
/// - `NotEnoughReports` if fewer than two reports match.
/// - `Stats` if any pair cannot be compared; no partial results are returned.
pub fn compare_across_history<'a>(
    name: &str,
    sets: &'a [ReportSet],
    options: &HistoryOptions<'_>,
) -> Result<Vec<Comparison<'a>>, CompareError> {
    validate_sets(sets)?;

    let mut matches: Vec<&'a Report> = sets
        .iter()
        .filter_map(|set| set.get(name))
        .filter(|r| options.filter.as_ref().map_or(true, |keep| keep(*r)))
        .collect();
    if let Some(sort) = &options.sort {
        matches.sort_by(|a, b| sort(*a, *b));
    }

    if matches.len() < 2 {
        return Err(CompareError::NotEnoughReports {
            name: name.to_string(),
            found: matches.len(),
        });
    }

    let pairs: Vec<(usize, usize)> = (0..matches.len())
        .flat_map(|i| (i + 1..matches.len()).map(move |j| (i, j)))
        .collect();
    compare_pairs(&matches, &pairs)
}

#[cfg(not(feature = "parallel"))]
fn compare_pairs<'a>(
    matches: &[&'a Report],
    pairs: &[(usize, usize)],
) -> Result<Vec<Comparison<'a>>, CompareError> {
    pairs
        .iter()
        .map(|&(i, j)| compare(matches[i], matches[j]))
        .collect()
}

#[cfg(feature = "parallel")]
fn compare_pairs<'a>(
    matches: &[&'a Report],
    pairs: &[(usize, usize)],
) -> Result<Vec<Comparison<'a>>, CompareError> {
    use rayon::prelude::*;

    // Indexed parallel collect keeps the pair order.
    pairs
        .par_iter()
        .map(|&(i, j)| compare(matches[i], matches[j]))
        .collect()
}
