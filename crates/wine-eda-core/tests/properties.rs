//! Property-based tests for the quality labels, correlation and regression

use proptest::prelude::*;
use wine_eda_core::features::{derive_features, derive_labels, QualityCategory, QUALITY_RULES};
use wine_eda_core::models::{fit_incremental, fit_ols, predict_with_interval};
use wine_eda_core::summary::{correlation_matrix, pearson};
use wine_eda_core::{Column, OlsOptions, PredictOptions, StatsError, WineTable};

fn measurements(alcohol: f64, density: f64, fixed_acidity: f64) -> [f64; 11] {
    let mut m = [1.0; 11];
    m[0] = fixed_acidity;
    m[7] = density;
    m[10] = alcohol;
    m
}

proptest! {
    #[test]
    fn prop_category_follows_quality(q in 1i32..=10) {
        let labels = derive_labels(q, 0).unwrap();
        let expected = if q <= 5 {
            QualityCategory::Low
        } else if q <= 7 {
            QualityCategory::Medium
        } else {
            QualityCategory::High
        };
        prop_assert_eq!(labels.quality_category, expected);
        prop_assert!(labels.quality_bucket.contains(q));
        prop_assert_eq!(i32::from(labels.quality_ordered.value()), q);
    }

    #[test]
    fn prop_out_of_domain_rejected(q in prop_oneof![-50i32..=0, 11i32..=50]) {
        let is_domain_error = matches!(derive_labels(q, 7), Err(StatsError::Domain { row: 7, .. }));
        prop_assert!(is_domain_error);
    }

    #[test]
    fn prop_bucket_and_category_consistent(qualities in prop::collection::vec(1i32..=10, 1..40)) {
        let rows = qualities.iter().map(|q| ([1.0; 11], *q)).collect();
        let labeled = derive_features(WineTable::combine(rows, Vec::new())).unwrap();

        for (sample, labels) in labeled.rows() {
            let rule = QUALITY_RULES
                .iter()
                .find(|r| r.bucket == labels.quality_bucket)
                .unwrap();
            prop_assert_eq!(rule.category, labels.quality_category);
            prop_assert!(labels.quality_bucket.contains(sample.quality));
        }
    }

    #[test]
    fn prop_loader_counts_add_up(n_red in 0usize..30, n_white in 0usize..30) {
        let red = vec![([1.0; 11], 5); n_red];
        let white = vec![([2.0; 11], 6); n_white];
        let table = WineTable::combine(red, white);

        prop_assert_eq!(table.len(), n_red + n_white);
        for (i, sample) in table.samples().iter().enumerate() {
            prop_assert_eq!(sample.id, i);
            let from_red = i < n_red;
            prop_assert_eq!(sample.color == wine_eda_core::WineColor::Red, from_red);
        }
    }

    #[test]
    fn prop_pearson_symmetric(
        pairs in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 3..50)
    ) {
        let (x, y): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        match (pearson(&x, &y), pearson(&y, &x)) {
            (Ok(a), Ok(b)) => {
                prop_assert!((a - b).abs() < 1e-12);
                prop_assert!((-1.0..=1.0).contains(&a));
            }
            (
                Err(StatsError::UndefinedCorrelation { .. }),
                Err(StatsError::UndefinedCorrelation { .. }),
            ) => {}
            (a, b) => prop_assert!(false, "asymmetric results: {:?} vs {:?}", a, b),
        }
    }

    #[test]
    fn prop_matrix_unit_diagonal(
        rows in prop::collection::vec((8.0f64..15.0, 0.98f64..1.01, 4.0f64..12.0, 3i32..=9), 3..40)
    ) {
        let rows = rows
            .iter()
            .map(|(a, d, f, q)| (measurements(*a, *d, *f), *q))
            .collect();
        let table = WineTable::combine(rows, Vec::new());
        let cols = [Column::Alcohol, Column::Density, Column::FixedAcidity, Column::Quality];
        let matrix = correlation_matrix(&table, &cols).unwrap();

        for a in cols {
            if let Some(r) = matrix.get(a, a).and_then(|c| c.r()) {
                prop_assert_eq!(r, 1.0);
            }
            for b in cols {
                prop_assert_eq!(matrix.get(a, b), matrix.get(b, a));
            }
        }
    }

    #[test]
    fn prop_r_squared_non_decreasing(
        rows in prop::collection::vec((8.0f64..15.0, 0.98f64..1.01, 4.0f64..12.0, 3i32..=9), 12..60)
    ) {
        let rows = rows
            .iter()
            .map(|(a, d, f, q)| (measurements(*a, *d, *f), *q))
            .collect();
        let table = WineTable::combine(rows, Vec::new());
        let predictors = [Column::Alcohol, Column::Density, Column::FixedAcidity];

        match fit_incremental(&table, Column::Quality, &predictors, &OlsOptions::default()) {
            Ok(models) => {
                for pair in models.windows(2) {
                    prop_assert!(pair[1].r_squared() >= pair[0].r_squared() - 1e-9);
                }
            }
            Err(StatsError::ConstantTarget) | Err(StatsError::SingularMatrix) => {}
            Err(e) => prop_assert!(false, "unexpected error: {}", e),
        }
    }

    #[test]
    fn prop_interval_contains_fit(
        train in prop::collection::vec((0.0f64..10.0, -5.0f64..5.0), 5..40),
        new_x in prop::collection::vec(-20.0f64..30.0, 1..10)
    ) {
        let x: Vec<f64> = train.iter().map(|(x, _)| *x).collect();
        let y: Vec<f64> = train.iter().map(|(x, e)| 1.5 * x + e).collect();

        if let Ok(fit) = fit_ols(&y, &[x], &OlsOptions::default()) {
            let report = predict_with_interval(&fit, &[new_x], &PredictOptions::default()).unwrap();
            for r in &report.results {
                prop_assert!(r.lower <= r.fit && r.fit <= r.upper);
            }
            prop_assert!(report.mean_lower_offset <= 0.0);
            prop_assert!(report.mean_upper_offset >= 0.0);
        }
    }
}
