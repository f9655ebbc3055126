//! Delimited-file loading for the wine datasets

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::dataset::WineTable;
use crate::errors::{StatsError, StatsResult};
use crate::types::{normalize_header, Column, WineColor};

/// Header-parsed delimited file
struct DelimitedFile {
    delimiter: char,
    headers: Vec<String>,
    /// (1-based line number, raw line)
    rows: Vec<(usize, String)>,
}

impl DelimitedFile {
    fn read(path: &Path) -> StatsResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| StatsError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut lines = content
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines.next().ok_or_else(|| StatsError::EmptyFile {
            path: path.to_path_buf(),
        })?;

        let delimiter = if header.contains(';') { ';' } else { ',' };
        let headers = split_cells(header, delimiter)
            .iter()
            .map(|h| normalize_header(h))
            .collect();

        let rows: Vec<(usize, String)> = lines.map(|(n, l)| (n, l.to_string())).collect();
        if rows.is_empty() {
            return Err(StatsError::EmptyFile {
                path: path.to_path_buf(),
            });
        }

        Ok(Self {
            delimiter,
            headers,
            rows,
        })
    }

    fn index_of(&self, path: &Path, column: Column) -> StatsResult<usize> {
        self.headers
            .iter()
            .position(|h| h == column.name())
            .ok_or_else(|| StatsError::MissingColumn {
                path: path.to_path_buf(),
                column: column.name(),
            })
    }

    /// Split every data row, checking the cell count against the header
    fn cells(&self, path: &Path) -> StatsResult<Vec<(usize, Vec<String>)>> {
        self.rows
            .iter()
            .map(|(line, raw)| {
                let cells = split_cells(raw, self.delimiter);
                if cells.len() != self.headers.len() {
                    return Err(StatsError::Load {
                        path: path.to_path_buf(),
                        reason: format!(
                            "line {} has {} cells, header has {}",
                            line,
                            cells.len(),
                            self.headers.len()
                        ),
                    });
                }
                Ok((*line, cells))
            })
            .collect()
    }
}

/// Split one line on `delimiter`, honoring double-quoted cells
fn split_cells(line: &str, delimiter: char) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

fn parse_f64(path: &Path, line: usize, column: Column, value: &str) -> StatsResult<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| StatsError::Parse {
            path: path.to_path_buf(),
            line,
            column: column.name().to_string(),
            value: value.to_string(),
        })
}

/// Quality must be integral; "6" and "6.0" are both accepted
fn parse_quality(path: &Path, line: usize, value: &str) -> StatsResult<i32> {
    if let Ok(q) = value.parse::<i32>() {
        return Ok(q);
    }
    match value.parse::<f64>() {
        Ok(q) if q.is_finite() && q.fract() == 0.0 && q.abs() <= f64::from(i32::MAX) => {
            Ok(q as i32)
        }
        _ => Err(StatsError::Parse {
            path: path.to_path_buf(),
            line,
            column: Column::Quality.name().to_string(),
            value: value.to_string(),
        }),
    }
}

/// Read one color's file into (measurements, quality) rows
///
/// The row-identifier column, if present, is ignored along with any other
/// column that is not a measurement or `quality`.
pub fn read_wine_file(path: &Path) -> StatsResult<Vec<([f64; 11], i32)>> {
    let file = DelimitedFile::read(path)?;

    let mut measurement_idx = [0usize; 11];
    for (slot, column) in measurement_idx.iter_mut().zip(Column::MEASUREMENTS) {
        *slot = file.index_of(path, column)?;
    }
    let quality_idx = file.index_of(path, Column::Quality)?;

    let mut rows = Vec::with_capacity(file.rows.len());
    for (line, cells) in file.cells(path)? {
        let mut measurements = [0.0; 11];
        for ((value, idx), column) in measurements
            .iter_mut()
            .zip(measurement_idx)
            .zip(Column::MEASUREMENTS)
        {
            *value = parse_f64(path, line, column, &cells[idx])?;
        }
        let quality = parse_quality(path, line, &cells[quality_idx])?;
        rows.push((measurements, quality));
    }

    debug!(path = %path.display(), rows = rows.len(), "read wine file");
    Ok(rows)
}

/// Load the red and white files into one combined table
///
/// Rows from `red` are tagged [`WineColor::Red`], rows from `white`
/// [`WineColor::White`]; ids are regenerated from zero across both.
pub fn load_wine_datasets(red: &Path, white: &Path) -> StatsResult<WineTable> {
    let red_rows = read_wine_file(red)?;
    let white_rows = read_wine_file(white)?;

    let table = WineTable::combine(red_rows, white_rows);
    debug!(
        rows = table.len(),
        red = table.count_color(WineColor::Red),
        white = table.count_color(WineColor::White),
        "combined wine datasets"
    );
    Ok(table)
}

/// Load the predictor columns of a prediction request file
///
/// # Returns
/// * One `Vec<f64>` per predictor (column-major), in `predictors` order
pub fn load_predictor_rows(path: &Path, predictors: &[Column]) -> StatsResult<Vec<Vec<f64>>> {
    if predictors.is_empty() {
        return Err(StatsError::EmptyInput {
            field: "predictors",
        });
    }

    let file = DelimitedFile::read(path)?;
    let indices = predictors
        .iter()
        .map(|c| file.index_of(path, *c))
        .collect::<StatsResult<Vec<usize>>>()?;

    let mut columns = vec![Vec::with_capacity(file.rows.len()); predictors.len()];
    for (line, cells) in file.cells(path)? {
        for ((col, idx), predictor) in columns.iter_mut().zip(&indices).zip(predictors) {
            col.push(parse_f64(path, line, *predictor, &cells[*idx])?);
        }
    }

    debug!(path = %path.display(), rows = columns[0].len(), "read prediction rows");
    Ok(columns)
}
