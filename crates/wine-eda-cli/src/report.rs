//! Report pipeline: load, derive, summarize, fit, predict

use anyhow::{Context, Result};
use tracing::info;
use wine_eda_core::dataset::{load_predictor_rows, load_wine_datasets};
use wine_eda_core::diagnostics::compute_vif;
use wine_eda_core::features::{category_counts, derive_features};
use wine_eda_core::models::fit_incremental;
use wine_eda_core::summary::{
    correlation_matrix, correlations_by_color, correlations_with, describe, describe_by_color,
    trimmed_range, CorrelationMatrix,
};
use wine_eda_core::{
    Column, OlsOptions, PredictOptions, StatsResult, SummaryOptions, WineColor, WineTable,
};

use crate::cli::Cli;
use crate::types::{
    CategoryCount, ColorCorrelations, ColorSummary, ColumnSummary, CorrelationEntry,
    ModelSummary, PredictionSummary, Report, RowCounts, TrimmedRange,
};

/// Predictors added one at a time to the quality model
pub const MODEL_PREDICTORS: [Column; 3] = [Column::Alcohol, Column::Density, Column::FixedAcidity];

/// Quantile bounds of the outlier-trimmed ranges
const TRIM_LOWER: f64 = 0.0;
const TRIM_UPPER: f64 = 0.99;

/// Run the whole pipeline for the files named on the command line
pub fn build_report(cli: &Cli) -> Result<Report> {
    let table = load_wine_datasets(&cli.red, &cli.white)
        .with_context(|| format!("loading {} and {}", cli.red.display(), cli.white.display()))?;
    info!(rows = table.len(), "loaded wine samples");

    let labeled = derive_features(table).context("deriving quality labels")?;
    let table = labeled.table();

    let category_counts = category_counts(&labeled)
        .into_iter()
        .map(|((color, category), count)| CategoryCount::new(color, category, count))
        .collect();

    let summary_options = SummaryOptions::default();
    let summaries = describe(table, &summary_options)
        .context("summarizing columns")?
        .values()
        .map(ColumnSummary::from)
        .collect();
    let summaries_by_color = describe_by_color(table, &summary_options)
        .context("summarizing columns by color")?
        .iter()
        .map(|(color, stats)| ColorSummary {
            color: color.as_str(),
            columns: stats.values().map(ColumnSummary::from).collect(),
        })
        .collect();

    let trimmed_ranges = Column::MEASUREMENTS
        .iter()
        .map(|c| {
            let (lower, upper) = trimmed_range(&table.column(*c), TRIM_LOWER, TRIM_UPPER)?;
            Ok(TrimmedRange {
                column: c.name(),
                lower_p: TRIM_LOWER,
                upper_p: TRIM_UPPER,
                lower,
                upper,
            })
        })
        .collect::<StatsResult<Vec<_>>>()
        .context("computing trimmed ranges")?;

    let matrix = correlation_matrix(table, &Column::ALL).context("correlating columns")?;
    let correlations = correlation_entries(&matrix);
    let correlations_by_color = correlations_by_color(table, &Column::ALL)
        .context("correlating columns by color")?
        .iter()
        .map(|(color, matrix)| ColorCorrelations {
            color: color.as_str(),
            pairs: correlation_entries(matrix),
        })
        .collect();
    let quality_correlations = correlations_with(table, Column::Quality, &Column::MEASUREMENTS)
        .context("correlating measurements with quality")?
        .into_iter()
        .map(|(x, c)| CorrelationEntry::new(x, Column::Quality, c))
        .collect();

    let (models, predictions) = fit_models(table, cli)?;

    Ok(Report {
        rows: RowCounts {
            total: table.len(),
            red: table.count_color(WineColor::Red),
            white: table.count_color(WineColor::White),
        },
        category_counts,
        summaries,
        summaries_by_color,
        trimmed_ranges,
        correlations,
        correlations_by_color,
        quality_correlations,
        models,
        predictions,
    })
}

fn correlation_entries(matrix: &CorrelationMatrix) -> Vec<CorrelationEntry> {
    matrix
        .pairs()
        .into_iter()
        .map(|(x, y, c)| CorrelationEntry::new(x, y, c))
        .collect()
}

/// Fit the nested quality models and, if requested, predict new rows with
/// the largest one
fn fit_models(
    table: &WineTable,
    cli: &Cli,
) -> Result<(Vec<ModelSummary>, Option<PredictionSummary>)> {
    let models = fit_incremental(
        table,
        Column::Quality,
        &MODEL_PREDICTORS,
        &OlsOptions::default(),
    )
    .context("fitting quality models")?;

    let summaries = models
        .iter()
        .map(|model| {
            let vif = compute_vif(&table.columns(model.predictors()))?;
            info!(
                predictors = model.predictors().len(),
                r_squared = model.r_squared(),
                "fitted quality model"
            );
            Ok(ModelSummary::new(model, vif))
        })
        .collect::<StatsResult<Vec<_>>>()
        .context("computing variance inflation factors")?;

    let predictions = match (&cli.predict, models.last()) {
        (Some(path), Some(model)) => {
            let x = load_predictor_rows(path, model.predictors())
                .with_context(|| format!("loading prediction rows from {}", path.display()))?;
            let options = PredictOptions {
                range_guard: cli.range_guard,
                ..Default::default()
            };
            let report = model.predict(&x, &options).context("predicting new rows")?;
            Some(PredictionSummary::new(model, &report))
        }
        _ => None,
    };

    Ok((summaries, predictions))
}
