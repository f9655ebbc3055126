//! Per-column distribution statistics

use std::collections::BTreeMap;

use statrs::statistics::Statistics;

use crate::dataset::WineTable;
use crate::errors::{StatsError, StatsResult};
use crate::types::{Column, SummaryOptions, WineColor};

/// Distribution statistics of one numeric column
#[derive(Debug, Clone)]
pub struct ColumnStats {
    pub column: Column,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1); NaN for a single observation
    pub std_dev: f64,
    /// (probability, quantile) pairs in the order requested
    pub quantiles: Vec<(f64, f64)>,
}

impl ColumnStats {
    /// Quantile previously computed at probability `p`
    pub fn quantile(&self, p: f64) -> Option<f64> {
        self.quantiles
            .iter()
            .find(|(prob, _)| (prob - p).abs() < 1e-12)
            .map(|(_, q)| *q)
    }
}

/// Quantile of already-sorted data by linear interpolation between order
/// statistics (Hyndman-Fan type 7): h = (n - 1)·p.
///
/// Kept local to match R's default `quantile(type = 7)`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> StatsResult<f64> {
    if sorted.is_empty() {
        return Err(StatsError::EmptyInput { field: "data" });
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(StatsError::InvalidInput(format!(
            "quantile probability {} is outside [0, 1]",
            p
        )));
    }

    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    Ok(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Quantile of unsorted data
pub fn quantile(values: &[f64], p: f64) -> StatsResult<f64> {
    quantile_sorted(&sorted_copy(values), p)
}

/// Range between the `lower` and `upper` quantiles, used to clip extreme
/// tails (e.g. 0th to 99th percentile).
pub fn trimmed_range(values: &[f64], lower: f64, upper: f64) -> StatsResult<(f64, f64)> {
    if lower > upper {
        return Err(StatsError::InvalidInput(format!(
            "lower quantile {} exceeds upper quantile {}",
            lower, upper
        )));
    }
    let sorted = sorted_copy(values);
    Ok((
        quantile_sorted(&sorted, lower)?,
        quantile_sorted(&sorted, upper)?,
    ))
}

/// Summarize one column of values
pub fn describe_column(
    column: Column,
    values: &[f64],
    options: &SummaryOptions,
) -> StatsResult<ColumnStats> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput { field: "values" });
    }

    let sorted = sorted_copy(values);
    let quantiles = options
        .quantiles
        .iter()
        .map(|p| Ok((*p, quantile_sorted(&sorted, *p)?)))
        .collect::<StatsResult<Vec<_>>>()?;

    Ok(ColumnStats {
        column,
        count: sorted.len(),
        min: Statistics::min(values),
        max: Statistics::max(values),
        mean: values.mean(),
        median: quantile_sorted(&sorted, 0.5)?,
        std_dev: values.std_dev(),
        quantiles,
    })
}

/// Summarize every numeric column of the table
pub fn describe(
    table: &WineTable,
    options: &SummaryOptions,
) -> StatsResult<BTreeMap<Column, ColumnStats>> {
    Column::ALL
        .iter()
        .map(|c| Ok((*c, describe_column(*c, &table.column(*c), options)?)))
        .collect()
}

/// [`describe`] for each color partition; colors with no rows are skipped
pub fn describe_by_color(
    table: &WineTable,
    options: &SummaryOptions,
) -> StatsResult<BTreeMap<WineColor, BTreeMap<Column, ColumnStats>>> {
    let mut by_color = BTreeMap::new();
    for color in WineColor::ALL {
        let subset = table.filter_color(color);
        if subset.is_empty() {
            continue;
        }
        by_color.insert(color, describe(&subset, options)?);
    }
    Ok(by_color)
}
