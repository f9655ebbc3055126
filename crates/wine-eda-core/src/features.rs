//! Quality-derived features
//!
//! Every sample gets three labels computed from its integer quality:
//! - an ordered quality score
//! - a right-closed bucket: `(0,5]`, `(5,7]` or `(7,10]`
//! - a category (`low`, `medium`, `high`) tied one-to-one to the bucket
//!
//! Buckets and categories live in a single ordered rule table; the first
//! rule whose bucket contains the quality wins.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::dataset::WineTable;
use crate::errors::{StatsError, StatsResult};
use crate::types::{WineColor, WineSample};

/// Right-closed integer interval `(lower, upper]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualityBucket {
    pub lower: i32,
    pub upper: i32,
}

impl QualityBucket {
    pub const fn new(lower: i32, upper: i32) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, quality: i32) -> bool {
        self.lower < quality && quality <= self.upper
    }
}

impl fmt::Display for QualityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{}]", self.lower, self.upper)
    }
}

/// Coarse quality label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityCategory {
    Low,
    Medium,
    High,
}

impl QualityCategory {
    pub const ALL: [QualityCategory; 3] = [
        QualityCategory::Low,
        QualityCategory::Medium,
        QualityCategory::High,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QualityCategory::Low => "low",
            QualityCategory::Medium => "medium",
            QualityCategory::High => "high",
        }
    }
}

impl fmt::Display for QualityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (bucket, category) pair of the rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketRule {
    pub bucket: QualityBucket,
    pub category: QualityCategory,
}

/// Ordered bucketing rules; together they cover exactly `(0, 10]`
pub const QUALITY_RULES: [BucketRule; 3] = [
    BucketRule {
        bucket: QualityBucket::new(0, 5),
        category: QualityCategory::Low,
    },
    BucketRule {
        bucket: QualityBucket::new(5, 7),
        category: QualityCategory::Medium,
    },
    BucketRule {
        bucket: QualityBucket::new(7, 10),
        category: QualityCategory::High,
    },
];

/// Quality score with ordering semantics, restricted to `(0, 10]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualityScore(u8);

impl QualityScore {
    pub fn value(self) -> u8 {
        self.0
    }
}

/// Labels attached to one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedLabels {
    pub quality_ordered: QualityScore,
    pub quality_bucket: QualityBucket,
    pub quality_category: QualityCategory,
}

/// First rule whose bucket contains `quality`
pub fn classify_quality(quality: i32) -> Option<&'static BucketRule> {
    QUALITY_RULES.iter().find(|rule| rule.bucket.contains(quality))
}

/// Derive the labels of one quality value
///
/// # Errors
/// * `StatsError::Domain` if `quality` is outside `(0, 10]`
pub fn derive_labels(quality: i32, row: usize) -> StatsResult<DerivedLabels> {
    let rule = classify_quality(quality).ok_or(StatsError::Domain { row, quality })?;
    let score = u8::try_from(quality).map_err(|_| StatsError::Domain { row, quality })?;

    Ok(DerivedLabels {
        quality_ordered: QualityScore(score),
        quality_bucket: rule.bucket,
        quality_category: rule.category,
    })
}

/// A wine table with derived labels appended, row for row
#[derive(Debug, Clone)]
pub struct LabeledTable {
    table: WineTable,
    labels: Vec<DerivedLabels>,
}

impl LabeledTable {
    pub fn table(&self) -> &WineTable {
        &self.table
    }

    pub fn labels(&self) -> &[DerivedLabels] {
        &self.labels
    }

    /// Iterate samples together with their labels
    pub fn rows(&self) -> impl Iterator<Item = (&WineSample, &DerivedLabels)> {
        self.table.samples().iter().zip(&self.labels)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Append derived labels to every row of `table`
///
/// Fails on the first row whose quality lies outside `(0, 10]`; the error
/// names that row's id.
pub fn derive_features(table: WineTable) -> StatsResult<LabeledTable> {
    let labels = table
        .samples()
        .iter()
        .map(|s| derive_labels(s.quality, s.id))
        .collect::<StatsResult<Vec<_>>>()?;

    debug!(rows = labels.len(), "derived quality labels");
    Ok(LabeledTable { table, labels })
}

/// Number of samples per (color, category) pair; pairs with no samples are
/// reported as zero.
pub fn category_counts(labeled: &LabeledTable) -> BTreeMap<(WineColor, QualityCategory), usize> {
    let mut counts: BTreeMap<(WineColor, QualityCategory), usize> = WineColor::ALL
        .iter()
        .flat_map(|color| QualityCategory::ALL.iter().map(move |cat| ((*color, *cat), 0)))
        .collect();

    for (sample, labels) in labeled.rows() {
        *counts
            .entry((sample.color, labels.quality_category))
            .or_insert(0) += 1;
    }
    counts
}
