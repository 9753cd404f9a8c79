//! Pairwise comparison of two reports.

use serde::Serialize;

use crate::error::{CompareError, StatsError};
use crate::report::Report;
use crate::statistics::{
    cohens_d, standard_error_of_difference, student_two_tailed_p_value, welch_degrees_of_freedom,
    welch_t_statistic,
};

/// Significance level for `different`.
pub const ALPHA: f64 = 0.05;

/// Result of comparing report `a` against report `b`.
///
/// Differences are `b - a`; percentages are relative to `a`. Purely derived
/// from the two borrowed reports: comparing the same pair twice yields
/// identical values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison<'a> {
    /// First report.
    pub a: &'a Report,
    /// Second report.
    pub b: &'a Report,

    /// Welch's t-statistic of `a.mean - b.mean`.
    #[serde(rename = "ts")]
    pub t_statistic: f64,
    /// Welch–Satterthwaite degrees of freedom.
    #[serde(rename = "df")]
    pub degrees_of_freedom: f64,
    /// Two-tailed p-value.
    #[serde(rename = "p")]
    pub p_value: f64,
    /// `p_value <= ALPHA`.
    pub different: bool,
    /// `a.mean < b.mean`.
    #[serde(rename = "aWins")]
    pub a_wins: bool,

    /// `b.mean - a.mean`.
    #[serde(rename = "dmean")]
    pub mean_difference: f64,
    /// Mean difference as a percentage of `a.mean`.
    #[serde(rename = "pmean")]
    pub mean_difference_percent: f64,
    /// `b.median - a.median`.
    #[serde(rename = "dmedian")]
    pub median_difference: f64,
    /// Median difference as a percentage of `a.median`.
    #[serde(rename = "pmedian")]
    pub median_difference_percent: f64,
    /// `b.ops - a.ops`.
    #[serde(rename = "dops")]
    pub ops_difference: f64,
    /// Ops difference as a percentage of `a.ops`.
    #[serde(rename = "pops")]
    pub ops_difference_percent: f64,

    /// Lower bound of the 95% interval for `b.mean - a.mean`.
    #[serde(rename = "ciLower")]
    pub ci_lower: f64,
    /// Upper bound of the 95% interval for `b.mean - a.mean`.
    #[serde(rename = "ciUpper")]
    pub ci_upper: f64,

    /// Cohen's d of `a.mean - b.mean`.
    #[serde(rename = "cohensd")]
    pub cohens_d: f64,
    /// Standard error of the mean difference.
    #[serde(rename = "se")]
    pub standard_error: f64,
}

/// Magnitude class of Cohen's d.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EffectSize {
    /// |d| < 0.2
    Negligible,
    /// 0.2 <= |d| < 0.5
    Small,
    /// 0.5 <= |d| < 0.8
    Medium,
    /// |d| >= 0.8
    Large,
}

impl EffectSize {
    /// Classify a Cohen's d value.
    pub fn from_cohens_d(d: f64) -> Self {
        let d = d.abs();
        if d < 0.2 {
            EffectSize::Negligible
        } else if d < 0.5 {
            EffectSize::Small
        } else if d < 0.8 {
            EffectSize::Medium
        } else {
            EffectSize::Large
        }
    }
}

/// Compare two reports with Welch's t-test.
///
/// The confidence interval is `(b.mean - a.mean) ± (a.moe + b.moe)`: the
/// two margins are summed rather than pooled, which is wider than a joint
/// interval. Stored histories were produced this way, so it is kept.
///
/// # Errors
///
/// - `InsufficientData` if either report has fewer than two samples.
/// - `DegenerateVariance` if both standard deviations are zero.
pub fn compare<'a>(a: &'a Report, b: &'a Report) -> Result<Comparison<'a>, CompareError> {
    compute(a, b).map_err(|source| CompareError::Stats {
        a: a.name.clone(),
        b: b.name.clone(),
        source,
    })
}

fn compute<'a>(a: &'a Report, b: &'a Report) -> Result<Comparison<'a>, StatsError> {
    let (s1, s2) = (a.standard_deviation, b.standard_deviation);
    let (n1, n2) = (a.size, b.size);

    let degrees_of_freedom = welch_degrees_of_freedom(s1, s2, n1, n2)?;
    let t_statistic = welch_t_statistic(a.mean, b.mean, s1, s2, n1, n2)?;
    let p_value = student_two_tailed_p_value(t_statistic, degrees_of_freedom)?;
    let cohens_d = cohens_d(a.mean, b.mean, s1, s2, n1, n2)?;
    let standard_error = standard_error_of_difference(s1, s2, n1, n2)?;

    let mean_difference = b.mean - a.mean;
    let margin = a.margin_of_error + b.margin_of_error;

    Ok(Comparison {
        a,
        b,
        t_statistic,
        degrees_of_freedom,
        p_value,
        different: p_value <= ALPHA,
        a_wins: a.mean < b.mean,
        mean_difference,
        mean_difference_percent: percent_change(a.mean, b.mean),
        median_difference: b.median - a.median,
        median_difference_percent: percent_change(a.median, b.median),
        ops_difference: b.ops_per_second - a.ops_per_second,
        ops_difference_percent: percent_change(a.ops_per_second, b.ops_per_second),
        ci_lower: mean_difference - margin,
        ci_upper: mean_difference + margin,
        cohens_d,
        standard_error,
    })
}

/// `(to - from) / from * 100`, or 0 when `from` is 0.
fn percent_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        0.0
    } else {
        (to - from) / from * 100.0
    }
}

impl<'a> Comparison<'a> {
    /// Magnitude class of the effect.
    pub fn effect_size(&self) -> EffectSize {
        EffectSize::from_cohens_d(self.cohens_d)
    }

    /// The faster report, if the difference is significant.
    pub fn faster(&self) -> Option<&'a Report> {
        match (self.different, self.a_wins) {
            (false, _) => None,
            (true, true) => Some(self.a),
            (true, false) => Some(self.b),
        }
    }

    /// How many times slower `b` is than `a` (`b.mean / a.mean`).
    pub fn speedup(&self) -> Option<f64> {
        if self.a.mean > 0.0 {
            Some(self.b.mean / self.a.mean)
        } else {
            None
        }
    }

    /// Whether the confidence interval excludes zero.
    pub fn interval_excludes_zero(&self) -> bool {
        self.ci_lower > 0.0 || self.ci_upper < 0.0
    }
}
