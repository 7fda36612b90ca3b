//! Trait for time series decomposition

use crate::error::Result;
use crate::model::DecompositionResult;

/// Additive decomposition of one equally spaced series.
///
/// Implementations are pure: the same input always yields the same result,
/// and `input = trend + seasonal + residual` at every point.
pub trait Decomposer: Send + Sync {
    /// Decompose a series into trend, seasonal, and residual components
    fn decompose(&self, values: &[f64]) -> Result<DecompositionResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock implementation: everything is trend
    struct TrivialDecomposer;

    impl Decomposer for TrivialDecomposer {
        fn decompose(&self, values: &[f64]) -> Result<DecompositionResult> {
            Ok(DecompositionResult {
                trend: values.to_vec(),
                seasonal: vec![0.0; values.len()],
                residual: vec![0.0; values.len()],
                weights: vec![1.0; values.len()],
            })
        }
    }

    #[test]
    fn test_trivial_decomposer_reconstructs() {
        let data = vec![10.0, 20.0, 30.0, 40.0, 50.0];
        let result = TrivialDecomposer.decompose(&data).unwrap();
        assert_eq!(result.reconstruct(), data);
    }

    #[test]
    fn test_decomposer_as_trait_object() {
        let decomposer: Box<dyn Decomposer> = Box::new(TrivialDecomposer);
        let result = decomposer.decompose(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_decomposer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TrivialDecomposer>();
    }
}
