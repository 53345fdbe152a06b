//! Column- and dataset-level statistics.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::Label;

/// A count together with its share of some total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatCountValue {
    pub count: usize,
    pub share: f64,
}

impl StatCountValue {
    pub fn new(count: usize, share: f64) -> Self {
        Self { count, share }
    }

    /// `count` as a share of `total`; zero when the total is zero.
    pub fn of(count: usize, total: usize) -> Self {
        let share = if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        };
        Self { count, share }
    }
}

/// Statistics every column has regardless of type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralColumnStats {
    pub missing_values: StatCountValue,
}

/// Statistics for numerical columns.
///
/// Moments and quantiles cover the finite values only and are NaN when
/// undefined (no finite values, or fewer than two for `std`). Equality
/// treats two undefined values as equal, so identical columns always
/// produce equal stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericalColumnStats {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    /// Sample standard deviation.
    pub std: f64,
    /// Keyed "p25" and "p75".
    pub quantiles: IndexMap<String, f64>,
    /// Infinite values as a share of non-missing values.
    pub infinite: StatCountValue,
}

impl NumericalColumnStats {
    /// Minimum, or `None` when undefined.
    pub fn min_value(&self) -> Option<f64> {
        defined(self.min)
    }

    pub fn max_value(&self) -> Option<f64> {
        defined(self.max)
    }

    pub fn mean_value(&self) -> Option<f64> {
        defined(self.mean)
    }

    pub fn std_value(&self) -> Option<f64> {
        defined(self.std)
    }

    pub fn p25(&self) -> Option<f64> {
        self.quantiles.get("p25").copied()
    }

    pub fn p75(&self) -> Option<f64> {
        self.quantiles.get("p75").copied()
    }
}

impl PartialEq for NumericalColumnStats {
    fn eq(&self, other: &Self) -> bool {
        same_stat(self.max, other.max)
            && same_stat(self.min, other.min)
            && same_stat(self.mean, other.mean)
            && same_stat(self.std, other.std)
            && self.infinite == other.infinite
            && self.quantiles.len() == other.quantiles.len()
            && self
                .quantiles
                .iter()
                .zip(&other.quantiles)
                .all(|((ka, va), (kb, vb))| ka == kb && same_stat(*va, *vb))
    }
}

/// Float equality where undefined (NaN) equals undefined.
fn same_stat(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn defined(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}

/// Frequency of a single categorical label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelStats {
    pub count: StatCountValue,
}

/// Statistics for categorical columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalColumnStats {
    pub unique_count: usize,
    /// Per-label frequencies, most frequent first.
    pub label_stats: IndexMap<Label, LabelStats>,
}

impl CategoricalColumnStats {
    /// The label with the greatest count. On ties the label earlier in
    /// `label_stats` wins, since a later one must be strictly greater.
    pub fn most_common(&self) -> Option<(&Label, &LabelStats)> {
        let mut best: Option<(&Label, &LabelStats)> = None;
        for (label, stats) in &self.label_stats {
            match best {
                Some((_, current)) if current.count.count >= stats.count.count => {}
                _ => best = Some((label, stats)),
            }
        }
        best
    }
}

/// Statistics for one column; detailed stats present only for their type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub general_stats: GeneralColumnStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numerical_stats: Option<NumericalColumnStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorical_stats: Option<CategoricalColumnStats>,
}

/// Statistics for a whole dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub row_count: usize,
    pub column_count: usize,
    pub column_stats: IndexMap<String, ColumnStats>,
}

impl DatasetStats {
    /// Empty aggregate for a table with `row_count` rows.
    pub fn new(row_count: usize) -> Self {
        Self {
            row_count,
            column_count: 0,
            column_stats: IndexMap::new(),
        }
    }

    /// Record the statistics of one more column.
    pub fn add_column(&mut self, name: impl Into<String>, stats: ColumnStats) {
        self.column_count += 1;
        self.column_stats.insert(name.into(), stats);
    }

    pub fn get(&self, column: &str) -> Option<&ColumnStats> {
        self.column_stats.get(column)
    }
}
