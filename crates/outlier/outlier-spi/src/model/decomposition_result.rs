//! Decomposition result model

use crate::model::Series;
use serde::{Deserialize, Serialize};

/// Additive trend/seasonal/residual split of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompositionResult {
    /// Trend component
    pub trend: Vec<f64>,
    /// Seasonal component
    pub seasonal: Vec<f64>,
    /// Residual component
    pub residual: Vec<f64>,
    /// Final robustness weight of each observation (1.0 when not robust)
    pub weights: Vec<f64>,
}

impl DecompositionResult {
    pub fn len(&self) -> usize {
        self.residual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residual.is_empty()
    }

    /// Sum of the three components at every time point.
    pub fn reconstruct(&self) -> Vec<f64> {
        self.trend
            .iter()
            .zip(&self.seasonal)
            .zip(&self.residual)
            .map(|((t, s), r)| t + s + r)
            .collect()
    }
}

/// A series together with its decomposition, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecomposedSeries {
    pub series: Series,
    pub components: DecompositionResult,
}
