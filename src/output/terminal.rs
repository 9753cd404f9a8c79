//! Terminal output formatting with colors and box drawing.

use colored::Colorize;

use crate::bench::Measurement;
use crate::compare::{Comparison, EffectSize};
use crate::report::Report;

/// Format a report for human-readable terminal output.
pub fn format_report(report: &Report) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);

    match &report.group {
        Some(group) => output.push_str(&format!("{} / {}\n", group, report.name.bold())),
        None => output.push_str(&format!("{}\n", report.name.bold())),
    }
    output.push_str(&sep);
    output.push('\n');

    if report.size == 0 {
        output.push_str(&format!("  {}\n", "\u{26A0} No samples recorded".yellow().bold()));
        return output;
    }

    output.push_str(&format!(
        "  {} ops/sec  {}  ({} samples)\n",
        format_ops(report.ops_per_second).green().bold(),
        format_rme(report.relative_margin_of_error),
        report.size
    ));
    output.push_str(&format!(
        "    Mean:   {}  \u{00B1} {}\n",
        format_ms(report.mean),
        format_ms(report.margin_of_error)
    ));
    output.push_str(&format!("    Median: {}\n", format_ms(report.median)));
    output.push_str(&format!("    SD:     {}\n", format_ms(report.standard_deviation)));
    if let (Some(fastest), Some(slowest)) = (report.fastest(), report.slowest()) {
        output.push_str(&format!(
            "    Range:  {} \u{2013} {}\n",
            format_ms(fastest),
            format_ms(slowest)
        ));
    }

    output
}

/// Format a report followed by the run's warnings and filtering summary.
pub fn format_measurement(measurement: &Measurement) -> String {
    let mut output = format_report(&measurement.report);

    let outliers = &measurement.outliers;
    if outliers.applied {
        output.push_str(&format!(
            "    Outliers: {} of {} removed\n",
            outliers.outliers_removed, outliers.total_samples
        ));
    }
    output.push_str(&format!(
        "    Inner loop: {} iterations\n",
        measurement.inner_iterations
    ));
    if measurement.stopped_early {
        output.push_str("    Stopped early: time budget reached\n");
    }

    if !measurement.warnings.is_empty() {
        output.push('\n');
        for warning in &measurement.warnings {
            output.push_str(&format!(
                "  {}\n",
                format!("\u{26A0} {}", warning).yellow()
            ));
        }
    }

    output
}

/// Format a comparison for human-readable terminal output.
pub fn format_comparison(comparison: &Comparison<'_>) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);
    let (a, b) = (comparison.a, comparison.b);

    output.push_str(&format!("{} vs {}\n", a.name.bold(), b.name.bold()));
    output.push_str(&sep);
    output.push('\n');

    match comparison.faster() {
        Some(winner) => {
            let loser = if std::ptr::eq(winner, a) { b } else { a };
            let factor = if winner.mean > 0.0 {
                loser.mean / winner.mean
            } else {
                0.0
            };
            output.push_str(&format!(
                "  {}\n\n",
                format!("\u{2713} {} is {:.2}x faster", winner.name, factor)
                    .green()
                    .bold()
            ));
        }
        None => {
            output.push_str(&format!(
                "  {}\n\n",
                "No significant difference".yellow().bold()
            ));
        }
    }

    output.push_str(&format!(
        "    Mean difference: {} ({:+.2}%)\n",
        format_signed_ms(comparison.mean_difference),
        comparison.mean_difference_percent
    ));
    output.push_str(&format!(
        "    95% CI:          [{}, {}]\n",
        format_signed_ms(comparison.ci_lower),
        format_signed_ms(comparison.ci_upper)
    ));
    output.push_str(&format!(
        "    t = {:.3}, df = {:.1}, p = {}\n",
        comparison.t_statistic,
        comparison.degrees_of_freedom,
        format_p(comparison.p_value)
    ));
    output.push_str(&format!(
        "    Cohen's d: {:.2} ({})\n",
        comparison.cohens_d,
        format_effect(comparison.effect_size())
    ));

    output
}

fn format_ms(ms: f64) -> String {
    if ms >= 1_000.0 {
        format!("{:.3} s", ms / 1_000.0)
    } else if ms >= 1.0 {
        format!("{:.3} ms", ms)
    } else if ms >= 0.001 {
        format!("{:.3} \u{00B5}s", ms * 1_000.0)
    } else {
        format!("{:.1} ns", ms * 1_000_000.0)
    }
}

fn format_signed_ms(ms: f64) -> String {
    if ms < 0.0 {
        format!("-{}", format_ms(-ms))
    } else {
        format!("+{}", format_ms(ms))
    }
}

fn format_ops(ops: f64) -> String {
    let whole = ops.round() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// RME is shown yellow above 10%.
fn format_rme(rme: f64) -> String {
    let text = format!("\u{00B1}{:.2}%", rme * 100.0);
    if rme > 0.10 {
        text.yellow().to_string()
    } else {
        text
    }
}

fn format_p(p: f64) -> String {
    if p < 0.001 {
        "<0.001".green().to_string()
    } else if p <= crate::compare::ALPHA {
        format!("{:.3}", p).green().to_string()
    } else {
        format!("{:.3}", p)
    }
}

fn format_effect(effect: EffectSize) -> String {
    match effect {
        EffectSize::Negligible => "negligible".to_string(),
        EffectSize::Small => "small".to_string(),
        EffectSize::Medium => "medium".yellow().to_string(),
        EffectSize::Large => "large".red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::compare;
    use crate::measurement::OutlierStats;
    use crate::report::Warning;

    fn make_report(name: &str, sample: Vec<f64>) -> Report {
        Report::from_samples(name, sample).unwrap()
    }

    #[test]
    fn test_format_report() {
        let report = make_report("sum", vec![0.5, 0.5, 0.5, 0.5]).with_group("math");
        let output = format_report(&report);
        assert!(output.contains("math / "));
        assert!(output.contains("sum"));
        assert!(output.contains("2,000"));
        assert!(output.contains("500.000 \u{00B5}s"));
        assert!(output.contains("(4 samples)"));
    }

    #[test]
    fn test_format_empty_report() {
        let output = format_report(&make_report("empty", Vec::new()));
        assert!(output.contains("No samples recorded"));
        assert!(!output.contains("ops/sec"));
    }

    #[test]
    fn test_format_measurement_lists_warnings() {
        let report = make_report("w", vec![1.0, 1.0]);
        let measurement = Measurement {
            warnings: report.reliability_warnings(0.1),
            outliers: OutlierStats::no_filtering(2),
            inner_iterations: 64,
            raw_samples: 2,
            stopped_early: true,
            elapsed_ms: 3.0,
            report,
        };
        let output = format_measurement(&measurement);
        assert!(output.contains("Inner loop: 64 iterations"));
        assert!(output.contains("Stopped early"));
        assert!(output.contains(&Warning::ZeroStandardDeviation.to_string()));
    }

    #[test]
    fn test_format_significant_comparison() {
        let a = make_report("fast", vec![1.0, 1.1, 0.9, 1.05]);
        let b = make_report("slow", vec![2.0, 2.1, 1.9, 2.05]);
        let output = format_comparison(&compare(&a, &b).unwrap());
        assert!(output.contains("fast is"));
        assert!(output.contains("x faster"));
        assert!(output.contains("Cohen's d"));
    }

    #[test]
    fn test_format_insignificant_comparison() {
        let a = make_report("a", vec![1.0, 2.0, 3.0]);
        let b = make_report("b", vec![1.0, 2.0, 3.0]);
        let output = format_comparison(&compare(&a, &b).unwrap());
        assert!(output.contains("No significant difference"));
        assert!(output.contains("p = 1.000"));
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_ms(2_500.0), "2.500 s");
        assert_eq!(format_ms(0.0000005), "0.5 ns");
        assert_eq!(format_signed_ms(-1.5), "-1.500 ms");
        assert_eq!(format_ops(1_234_567.4), "1,234,567");
        assert_eq!(format_ops(999.0), "999");
    }
}
