//! Combined in-memory wine table

use crate::types::{Column, WineColor, WineSample};

/// Immutable table of wine samples from both colors
#[derive(Debug, Clone, Default)]
pub struct WineTable {
    samples: Vec<WineSample>,
}

impl WineTable {
    /// Concatenate red and white rows, assigning contiguous zero-based ids
    /// (red rows first).
    pub fn combine(red: Vec<([f64; 11], i32)>, white: Vec<([f64; 11], i32)>) -> Self {
        let tagged = red
            .into_iter()
            .map(|row| (WineColor::Red, row))
            .chain(white.into_iter().map(|row| (WineColor::White, row)));

        let samples = tagged
            .enumerate()
            .map(|(id, (color, (measurements, quality)))| WineSample {
                id,
                color,
                measurements,
                quality,
            })
            .collect();

        Self { samples }
    }

    pub fn samples(&self) -> &[WineSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Values of one numeric column, in row order
    pub fn column(&self, column: Column) -> Vec<f64> {
        self.samples.iter().map(|s| s.value(column)).collect()
    }

    /// Values of several columns, one `Vec` per column
    pub fn columns(&self, columns: &[Column]) -> Vec<Vec<f64>> {
        columns.iter().map(|c| self.column(*c)).collect()
    }

    /// Rows of one color; original ids are kept
    pub fn filter_color(&self, color: WineColor) -> WineTable {
        WineTable {
            samples: self
                .samples
                .iter()
                .filter(|s| s.color == color)
                .cloned()
                .collect(),
        }
    }

    pub fn count_color(&self, color: WineColor) -> usize {
        self.samples.iter().filter(|s| s.color == color).count()
    }
}
