// ============================================================
// Layer 3 — Year Series Types
// ============================================================
// Shapes handed to the plotting sink.
//
// YearSeries keeps `years` and `values` as two index-aligned
// vectors because that is exactly the (x, y) pair a plotting
// tool consumes. Construction goes through `push`, which is the
// only way to grow the series, so the two vectors can never
// drift out of step.

use serde::{Deserialize, Serialize};

/// Mean metric value per year, ascending by year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearSeries {
    years:  Vec<i32>,
    values: Vec<f64>,
}

impl YearSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one point. Years must arrive in strictly ascending order.
    pub fn push(&mut self, year: i32, value: f64) {
        debug_assert!(
            self.years.last().map_or(true, |&last| last < year),
            "years must be pushed in ascending order"
        );
        self.years.push(year);
        self.values.push(value);
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn get(&self, year: i32) -> Option<f64> {
        self.years
            .binary_search(&year)
            .ok()
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.years.iter().copied().zip(self.values.iter().copied())
    }

    /// Consume the series into the (x, y) tuple the plotting sink expects.
    pub fn into_parts(self) -> (Vec<i32>, Vec<f64>) {
        (self.years, self.values)
    }
}

/// A fitted polynomial trend over a YearSeries.
///
/// The fit is done on years mapped to [-1, 1]:
///   t = (year - center) / half_span
/// and `coefficients[i]` multiplies t^i.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothedCurve {
    pub degree:       usize,
    pub coefficients: Vec<f64>,
    pub center:       f64,
    pub half_span:    f64,
    pub xs:           Vec<f64>,
    pub ys:           Vec<f64>,
}

impl SmoothedCurve {
    /// Evaluate the fitted polynomial at a (real-valued) year.
    pub fn evaluate(&self, year: f64) -> f64 {
        let t = (year - self.center) / self.half_span;
        // Horner's scheme, highest power first
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * t + c)
    }
}

/// Mean for one session folder, used by the `sessions` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMean {
    pub year:       i32,
    pub session_id: String,
    pub mean:       f64,
    pub documents:  usize,
}

/// Size of one year's slice of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearStats {
    pub year:      i32,
    pub documents: usize,
    pub tokens:    usize,
}
