//! Text and JSON rendering of a [`Report`]

use std::io::{self, Write};

use crate::cli::OutputFormat;
use crate::types::{ColumnSummary, CorrelationEntry, ModelSummary, PredictionSummary, Report};

/// Write the report in the requested format
pub fn render(report: &Report, format: OutputFormat, out: &mut impl Write) -> io::Result<()> {
    match format {
        OutputFormat::Text => render_text(report, out),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)
        }
    }
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "NA".to_string(),
    }
}

fn render_text(report: &Report, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "== Rows ==")?;
    writeln!(
        out,
        "total {}  red {}  white {}",
        report.rows.total, report.rows.red, report.rows.white
    )?;

    writeln!(out)?;
    writeln!(out, "== Quality categories ==")?;
    writeln!(out, "{:<8} {:<8} {:<8} {:>7}", "color", "category", "bucket", "count")?;
    for c in &report.category_counts {
        writeln!(
            out,
            "{:<8} {:<8} {:<8} {:>7}",
            c.color, c.category, c.bucket, c.count
        )?;
    }

    writeln!(out)?;
    writeln!(out, "== Summary (all wines) ==")?;
    write_summaries(&report.summaries, out)?;
    for color in &report.summaries_by_color {
        writeln!(out)?;
        writeln!(out, "== Summary ({} wines) ==", color.color)?;
        write_summaries(&color.columns, out)?;
    }

    writeln!(out)?;
    writeln!(out, "== Trimmed ranges ==")?;
    for t in &report.trimmed_ranges {
        writeln!(
            out,
            "{:<22} q{:<6} {:>10.4}  q{:<6} {:>10.4}",
            t.column, t.lower_p, t.lower, t.upper_p, t.upper
        )?;
    }

    writeln!(out)?;
    writeln!(out, "== Correlations ==")?;
    write_correlations(&report.correlations, out)?;
    for color in &report.correlations_by_color {
        writeln!(out)?;
        writeln!(out, "== Correlations ({} wines) ==", color.color)?;
        write_correlations(&color.pairs, out)?;
    }

    writeln!(out)?;
    writeln!(out, "== Correlation with quality ==")?;
    write_correlations(&report.quality_correlations, out)?;

    for model in &report.models {
        writeln!(out)?;
        write_model(model, out)?;
    }

    if let Some(predictions) = &report.predictions {
        writeln!(out)?;
        write_predictions(predictions, out)?;
    }
    Ok(())
}

fn write_summaries(summaries: &[ColumnSummary], out: &mut impl Write) -> io::Result<()> {
    write!(
        out,
        "{:<22} {:>6} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "column", "n", "min", "max", "mean", "median", "sd"
    )?;
    if let Some(first) = summaries.first() {
        for q in &first.quantiles {
            write!(out, " {:>10}", format!("q{}", q.p))?;
        }
    }
    writeln!(out)?;

    for s in summaries {
        write!(
            out,
            "{:<22} {:>6} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
            s.column, s.count, s.min, s.max, s.mean, s.median, s.std_dev
        )?;
        for q in &s.quantiles {
            write!(out, " {:>10.4}", q.value)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_correlations(entries: &[CorrelationEntry], out: &mut impl Write) -> io::Result<()> {
    for e in entries {
        writeln!(
            out,
            "{:<22} {:<22} {:>8} {}",
            e.x,
            e.y,
            fmt_opt(e.r, 4),
            e.strength
        )?;
    }
    Ok(())
}

fn write_model(model: &ModelSummary, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "== Model: {} ~ {} ==",
        model.target,
        model.predictors.join(" + ")
    )?;
    writeln!(
        out,
        "n {}  R² {:.4}  adj R² {:.4}  sigma {:.4}",
        model.n_observations, model.r_squared, model.adj_r_squared, model.residual_std_error
    )?;
    writeln!(
        out,
        "{:<16} {:>12} {:>10} {:>9} {:>10} {:>12} {:>12}",
        "term", "estimate", "std.err", "t", "p", "ci.lower", "ci.upper"
    )?;
    for c in &model.coefficients {
        writeln!(
            out,
            "{:<16} {:>12.6} {:>10} {:>9} {:>10} {:>12} {:>12}",
            c.term,
            c.estimate,
            fmt_opt(c.std_error, 6),
            fmt_opt(c.t_value, 3),
            fmt_opt(c.p_value, 4),
            fmt_opt(c.ci_lower, 6),
            fmt_opt(c.ci_upper, 6)
        )?;
    }
    if model.predictors.len() > 1 {
        let vif: Vec<String> = model
            .predictors
            .iter()
            .zip(&model.vif)
            .map(|(name, v)| format!("{}={:.3}", name, v))
            .collect();
        writeln!(out, "VIF: {}", vif.join("  "))?;
    }
    Ok(())
}

fn write_predictions(predictions: &PredictionSummary, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "== Predictions ({:.0}% interval) ==",
        predictions.confidence_level * 100.0
    )?;
    for name in &predictions.predictors {
        write!(out, "{:>14} ", name)?;
    }
    writeln!(out, "{:>10} {:>10} {:>10}", "fit", "lower", "upper")?;
    for row in &predictions.rows {
        for v in &row.inputs {
            write!(out, "{:>14.4} ", v)?;
        }
        writeln!(out, "{:>10.4} {:>10.4} {:>10.4}", row.fit, row.lower, row.upper)?;
    }
    writeln!(
        out,
        "mean(lower - fit) {:.4}  mean(upper - fit) {:.4}",
        predictions.mean_lower_offset, predictions.mean_upper_offset
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CoefficientEntry, ColorCorrelations, PredictionEntry, RowCounts};

    fn tiny_report() -> Report {
        Report {
            rows: RowCounts {
                total: 3,
                red: 2,
                white: 1,
            },
            category_counts: Vec::new(),
            summaries: Vec::new(),
            summaries_by_color: Vec::new(),
            trimmed_ranges: Vec::new(),
            correlations: vec![CorrelationEntry {
                x: "ph",
                y: "ph",
                r: None,
                strength: "undefined",
            }],
            correlations_by_color: vec![ColorCorrelations {
                color: "red",
                pairs: vec![CorrelationEntry {
                    x: "alcohol",
                    y: "density",
                    r: Some(-0.62),
                    strength: "high",
                }],
            }],
            quality_correlations: Vec::new(),
            models: vec![ModelSummary {
                target: "quality",
                predictors: vec!["alcohol"],
                r_squared: 0.5,
                adj_r_squared: 0.4,
                residual_std_error: 0.7,
                n_observations: 3,
                coefficients: vec![CoefficientEntry {
                    term: "(intercept)",
                    estimate: 1.0,
                    std_error: None,
                    t_value: None,
                    p_value: None,
                    ci_lower: None,
                    ci_upper: None,
                }],
                vif: vec![1.0],
            }],
            predictions: Some(PredictionSummary {
                predictors: vec!["alcohol"],
                confidence_level: 0.95,
                rows: vec![PredictionEntry {
                    inputs: vec![10.0],
                    fit: 5.5,
                    lower: 4.0,
                    upper: 7.0,
                }],
                mean_lower_offset: -1.5,
                mean_upper_offset: 1.5,
            }),
        }
    }

    #[test]
    fn test_render_text_sections() {
        let mut buf = Vec::new();
        render(&tiny_report(), OutputFormat::Text, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("total 3  red 2  white 1"));
        assert!(text.contains("undefined"));
        assert!(text.contains("== Correlations (red wines) =="));
        assert!(text.contains("-0.6200 high"));
        assert!(text.contains("== Model: quality ~ alcohol =="));
        assert!(text.contains("== Predictions (95% interval) =="));
        assert!(text.contains("mean(lower - fit) -1.5000"));
    }

    #[test]
    fn test_render_json_is_valid() {
        let mut buf = Vec::new();
        render(&tiny_report(), OutputFormat::Json, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value["rows"]["total"], 3);
        assert!(value["correlations"][0]["r"].is_null());
        assert_eq!(value["correlations_by_color"][0]["color"], "red");
        assert_eq!(value["correlations_by_color"][0]["pairs"][0]["r"], -0.62);
        assert_eq!(value["predictions"]["mean_upper_offset"], 1.5);
    }
}
