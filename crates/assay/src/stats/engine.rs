//! Per-column statistics, dispatched on semantic type.

use std::cmp::Ordering;

use indexmap::IndexMap;
use tracing::debug;

use super::column::{
    CategoricalColumnStats, ColumnStats, GeneralColumnStats, LabelStats, NumericalColumnStats,
    StatCountValue,
};
use crate::input::{Label, Series};
use crate::schema::ColumnType;

/// Statistics configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsConfig {
    /// Count missing values into the general stats. Off by default, in
    /// which case the missing-value entry is always `{0, 0.0}`.
    pub track_missing_values: bool,
}

impl StatsConfig {
    pub fn with_missing_values(mut self, enabled: bool) -> Self {
        self.track_missing_values = enabled;
        self
    }
}

/// Computes [`ColumnStats`] for a single column.
///
/// Collection is a pure function of the column type and values, so the
/// initial full pass and later single-column additions share it.
#[derive(Debug, Clone, Default)]
pub struct StatsEngine {
    config: StatsConfig,
}

impl StatsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StatsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> StatsConfig {
        self.config
    }

    /// Collect statistics for a column of the given type.
    pub fn collect(&self, column_type: ColumnType, series: &Series) -> ColumnStats {
        let missing_values = if self.config.track_missing_values {
            StatCountValue::of(series.missing_count(), series.len())
        } else {
            StatCountValue::default()
        };

        let numerical_stats =
            (column_type == ColumnType::Numerical).then(|| collect_numerical_stats(series));
        let categorical_stats =
            (column_type == ColumnType::Categorical).then(|| collect_categorical_stats(series));

        debug!(
            %column_type,
            rows = series.len(),
            numerical = numerical_stats.is_some(),
            categorical = categorical_stats.is_some(),
            "collected column stats"
        );

        ColumnStats {
            general_stats: GeneralColumnStats { missing_values },
            numerical_stats,
            categorical_stats,
        }
    }
}

// =============================================================================
// NUMERICAL
// =============================================================================

/// Running mean and variance using Welford's algorithm.
#[derive(Debug, Clone, Copy)]
struct RunningMoments {
    count: usize,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningMoments {
    fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn add(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn mean(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.mean }
    }

    /// Sample standard deviation (n - 1 denominator).
    fn std(&self) -> f64 {
        if self.count < 2 {
            f64::NAN
        } else {
            (self.m2 / (self.count - 1) as f64).sqrt()
        }
    }

    fn min(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.min }
    }

    fn max(&self) -> f64 {
        if self.count == 0 { f64::NAN } else { self.max }
    }
}

/// Quantile of sorted values by linear interpolation between closest ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Numerical statistics over a column's values.
///
/// Values are coerced the way [`Value::to_numeric`](crate::input::Value::to_numeric) does: strings are parsed,
/// booleans count as 0 and 1, and anything without a numeric reading is
/// treated as missing.
pub fn collect_numerical_stats(series: &Series) -> NumericalColumnStats {
    let present: Vec<f64> = series
        .values()
        .iter()
        .filter_map(|v| v.to_numeric().as_f64())
        .filter(|v| !v.is_nan())
        .collect();

    let infinite_count = present.iter().filter(|v| v.is_infinite()).count();

    let mut finite: Vec<f64> = present.iter().copied().filter(|v| v.is_finite()).collect();
    let mut moments = RunningMoments::new();
    for &value in &finite {
        moments.add(value);
    }
    finite.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut quantiles = IndexMap::new();
    quantiles.insert("p25".to_string(), quantile(&finite, 0.25));
    quantiles.insert("p75".to_string(), quantile(&finite, 0.75));

    NumericalColumnStats {
        max: moments.max(),
        min: moments.min(),
        mean: moments.mean(),
        std: moments.std(),
        quantiles,
        infinite: StatCountValue::of(infinite_count, present.len()),
    }
}

// =============================================================================
// CATEGORICAL
// =============================================================================

/// Categorical statistics over a column's non-missing values.
///
/// Labels are ordered by descending count; equal counts keep first-seen order.
pub fn collect_categorical_stats(series: &Series) -> CategoricalColumnStats {
    let mut counts: IndexMap<&Label, usize> = IndexMap::new();
    for value in series.non_missing() {
        *counts.entry(value).or_insert(0) += 1;
    }
    let total: usize = counts.values().sum();

    let mut ordered: Vec<(&Label, usize)> = counts.into_iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1));

    CategoricalColumnStats {
        unique_count: ordered.len(),
        label_stats: ordered
            .into_iter()
            .map(|(label, count)| {
                (
                    label.clone(),
                    LabelStats {
                        count: StatCountValue::of(count, total),
                    },
                )
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{StorageKind, Value};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_numerical_stats() {
        let series = Series::floats([1.0, 2.0, 3.0, 4.0]);
        let stats = collect_numerical_stats(&series);

        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_close(stats.mean, 2.5);
        assert_close(stats.std, 1.290_994_448_735_805_6);
        assert_close(stats.p25().unwrap(), 1.75);
        assert_close(stats.p75().unwrap(), 3.25);
        assert_eq!(stats.infinite, StatCountValue::new(0, 0.0));
    }

    #[test]
    fn test_infinite_share() {
        let series = Series::floats([
            1.0,
            f64::INFINITY,
            2.0,
            f64::NEG_INFINITY,
            3.0,
            4.0,
            5.0,
            6.0,
            f64::NAN,
        ]);
        let stats = collect_numerical_stats(&series);

        assert_eq!(stats.infinite.count, 2);
        assert_close(stats.infinite.share, 0.25);
        // Infinities are excluded from the moments.
        assert_eq!(stats.max, 6.0);
        assert_eq!(stats.min, 1.0);
    }

    #[test]
    fn test_no_values_gives_zero_share() {
        let series = Series::from_values(StorageKind::Float, [Value::Null, Value::Float(f64::NAN)]);
        let stats = collect_numerical_stats(&series);

        assert_eq!(stats.infinite, StatCountValue::new(0, 0.0));
        assert!(stats.mean.is_nan());
        assert!(stats.p25().unwrap().is_nan());
    }

    #[test]
    fn test_single_value_std_undefined() {
        let stats = collect_numerical_stats(&Series::integers([7]));
        assert_eq!(stats.mean, 7.0);
        assert!(stats.std.is_nan());
    }

    #[test]
    fn test_categorical_stats_order() {
        let series = Series::objects(["b", "a", "a", "c", "b", "a"]);
        let stats = collect_categorical_stats(&series);

        assert_eq!(stats.unique_count, 3);
        let labels: Vec<&Label> = stats.label_stats.keys().collect();
        assert_eq!(labels, vec![&Value::from("a"), &Value::from("b"), &Value::from("c")]);
        let a = &stats.label_stats[&Value::from("a")];
        assert_eq!(a.count.count, 3);
        assert_close(a.count.share, 0.5);
    }

    #[test]
    fn test_categorical_ties_keep_first_seen() {
        let series = Series::objects(["A", "B", "A", "B", "A", "B"]);
        let stats = collect_categorical_stats(&series);
        assert_eq!(stats.most_common().unwrap().0, &Value::from("A"));
    }

    #[test]
    fn test_categorical_skips_missing() {
        let series = Series::from_values(
            StorageKind::Integer,
            [Value::Int(1), Value::Null, Value::Int(1), Value::Int(2)],
        );
        let stats = collect_categorical_stats(&series);
        assert_eq!(stats.unique_count, 2);
        assert_close(stats.label_stats[&Value::Int(1)].count.share, 2.0 / 3.0);
    }

    #[test]
    fn test_collect_dispatches_on_type() {
        let engine = StatsEngine::new();
        let series = Series::integers([1, 2, 2]);

        let numerical = engine.collect(ColumnType::Numerical, &series);
        assert!(numerical.numerical_stats.is_some());
        assert!(numerical.categorical_stats.is_none());

        let categorical = engine.collect(ColumnType::Categorical, &series);
        assert!(categorical.numerical_stats.is_none());
        assert!(categorical.categorical_stats.is_some());

        let text = engine.collect(ColumnType::Text, &series);
        assert!(text.numerical_stats.is_none());
        assert!(text.categorical_stats.is_none());
    }

    #[test]
    fn test_missing_values_placeholder_by_default() {
        let series = Series::from_values(StorageKind::Float, [Value::Null, Value::Float(1.0)]);
        let stats = StatsEngine::new().collect(ColumnType::Numerical, &series);
        assert_eq!(stats.general_stats.missing_values, StatCountValue::new(0, 0.0));
    }

    #[test]
    fn test_missing_values_tracked_when_enabled() {
        let engine = StatsEngine::with_config(StatsConfig::default().with_missing_values(true));
        let series = Series::from_values(
            StorageKind::Float,
            [Value::Null, Value::Float(1.0), Value::Float(f64::NAN), Value::Float(2.0)],
        );
        let stats = engine.collect(ColumnType::Numerical, &series);
        assert_eq!(stats.general_stats.missing_values, StatCountValue::new(2, 0.5));
    }

    #[test]
    fn test_string_cells_are_coerced() {
        let series = Series::objects([
            Value::from("1.5"),
            Value::from(" 2.5 "),
            Value::from("n/a"),
            Value::Int(4),
        ]);
        let stats = collect_numerical_stats(&series);

        assert_eq!(stats.min, 1.5);
        assert_eq!(stats.max, 4.0);
        assert_close(stats.mean, 8.0 / 3.0);
        assert_eq!(stats.infinite, StatCountValue::new(0, 0.0));
    }

    #[test]
    fn test_numerical_collect_is_idempotent_when_undefined() {
        let engine = StatsEngine::new();
        let single = Series::floats([7.0]);
        let empty = Series::from_values(StorageKind::Float, [Value::Null, Value::Float(f64::NAN)]);
        let no_rows = Series::floats([]);

        for series in [&single, &empty, &no_rows] {
            assert_eq!(
                engine.collect(ColumnType::Numerical, series),
                engine.collect(ColumnType::Numerical, series)
            );
        }
        assert!(engine
            .collect(ColumnType::Numerical, &single)
            .numerical_stats
            .unwrap()
            .std
            .is_nan());
    }

    #[test]
    fn test_collect_is_idempotent() {
        let engine = StatsEngine::new();
        let series = Series::objects(["x", "y", "x"]);
        assert_eq!(
            engine.collect(ColumnType::Categorical, &series),
            engine.collect(ColumnType::Categorical, &series)
        );
    }
}
