use {
    crate::analysis::AnalysisError,
    serde::{Deserialize, Serialize},
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp_ms: i64,
    pub close: f64,
}

/// Chronological close prices. Timestamps are strictly increasing.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    timestamps: Vec<i64>,
    close_prices: Vec<f64>,
}

impl PriceSeries {
    pub fn new(points: &[PricePoint]) -> Result<Self, AnalysisError> {
        if let Some(index) = points
            .windows(2)
            .position(|w| w[1].timestamp_ms <= w[0].timestamp_ms)
        {
            return Err(AnalysisError::UnorderedTimestamps { index: index + 1 });
        }

        Ok(Self {
            timestamps: points.iter().map(|p| p.timestamp_ms).collect(),
            close_prices: points.iter().map(|p| p.close).collect(),
        })
    }

    /// Convenience for `(timestamp_ms, close)` pairs.
    pub fn from_pairs(pairs: &[(i64, f64)]) -> Result<Self, AnalysisError> {
        let points: Vec<PricePoint> = pairs
            .iter()
            .map(|&(timestamp_ms, close)| PricePoint {
                timestamp_ms,
                close,
            })
            .collect();
        Self::new(&points)
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn close_prices(&self) -> &[f64] {
        &self.close_prices
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_repeated_or_backwards_timestamps() {
        let err = PriceSeries::from_pairs(&[(1, 1.0), (2, 2.0), (2, 3.0)]).unwrap_err();
        assert_eq!(err, AnalysisError::UnorderedTimestamps { index: 2 });

        let err = PriceSeries::from_pairs(&[(5, 1.0), (4, 2.0)]).unwrap_err();
        assert_eq!(err, AnalysisError::UnorderedTimestamps { index: 1 });
    }

    #[test]
    fn keeps_points_in_order() {
        let series = PriceSeries::from_pairs(&[(10, 1.5), (20, 2.5)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.timestamps(), &[10, 20]);
        assert_eq!(series.close_prices(), &[1.5, 2.5]);
    }
}
