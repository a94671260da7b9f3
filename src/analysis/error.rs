use thiserror::Error;

/// Typed failures surfaced by the wave pipeline.
///
/// "No candidate found" is a normal outcome and lives in
/// [`AnalysisOutcome`](crate::models::AnalysisOutcome), not here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("wave 1 has zero price range (start = end = {price}), retracement is undefined")]
    DegenerateWave { price: f64 },

    #[error("timestamps must be strictly increasing (violated at index {index})")]
    UnorderedTimestamps { index: usize },
}
