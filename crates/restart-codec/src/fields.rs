//! Named 3-D fields decoded from a restart file.

use indexmap::IndexMap;
use ndarray::{Array3, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{RestartError, Result};

/// Mapping from field name to an `(nx, ny, nz)` array.
///
/// Iteration follows insertion order, which for decoded sets is the on-disk
/// layout order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldSet {
    fields: IndexMap<String, Array3<f32>>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            fields: IndexMap::with_capacity(n),
        }
    }

    /// Insert or replace a field, returning the previous array.
    pub fn insert(&mut self, name: impl Into<String>, data: Array3<f32>) -> Option<Array3<f32>> {
        self.fields.insert(name.into(), data)
    }

    pub fn get(&self, name: &str) -> Option<&Array3<f32>> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Array3<f32>> {
        self.fields.get_mut(name)
    }

    /// Remove a field, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<Array3<f32>> {
        self.fields.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array3<f32>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn require(&self, name: &str) -> Result<&Array3<f32>> {
        self.fields
            .get(name)
            .ok_or_else(|| RestartError::missing_field(name))
    }

    /// Horizontal `(nx, ny)` slice of a field at vertical index `k`.
    pub fn level(&self, name: &str, k: usize) -> Result<ArrayView2<'_, f32>> {
        let field = self.require(name)?;
        let nz = field.len_of(Axis(2));
        if k >= nz {
            return Err(RestartError::Index {
                required: k + 1,
                available: nz,
            });
        }
        Ok(field.index_axis(Axis(2), k))
    }

    /// Summary statistics of one field.
    pub fn summary(&self, name: &str) -> Result<FieldStats> {
        Ok(FieldStats::from_values(self.require(name)?.iter().copied()))
    }
}

impl FromIterator<(String, Array3<f32>)> for FieldSet {
    fn from_iter<T: IntoIterator<Item = (String, Array3<f32>)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FieldSet {
    type Item = (String, Array3<f32>);
    type IntoIter = indexmap::map::IntoIter<String, Array3<f32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Min/max/mean of the finite values in a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub min: f32,
    pub max: f32,
    pub mean: f64,
    /// Finite values counted.
    pub count: usize,
    /// NaN and infinite values skipped.
    pub non_finite: usize,
}

impl FieldStats {
    /// Compute statistics; min/max/mean are NaN when no value is finite.
    pub fn from_values(values: impl IntoIterator<Item = f32>) -> Self {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0f64;
        let mut count = 0usize;
        let mut non_finite = 0usize;

        for v in values {
            if !v.is_finite() {
                non_finite += 1;
                continue;
            }
            min = min.min(v);
            max = max.max(v);
            sum += v as f64;
            count += 1;
        }

        if count == 0 {
            return Self {
                min: f32::NAN,
                max: f32::NAN,
                mean: f64::NAN,
                count,
                non_finite,
            };
        }

        Self {
            min,
            max,
            mean: sum / count as f64,
            count,
            non_finite,
        }
    }

    pub fn range(&self) -> f32 {
        self.max - self.min
    }
}
