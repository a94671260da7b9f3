use crate::{
    analysis::AnalysisError,
    config::{FibBand, WAVE},
    domain::{WaveCandidate, WaveLabel},
};

/// Labels a candidate from its segment proportions.
#[derive(Debug, Clone, Copy)]
pub struct WaveClassifier {
    band: FibBand,
}

impl Default for WaveClassifier {
    fn default() -> Self {
        Self::new(WAVE.classify.retracement)
    }
}

impl WaveClassifier {
    pub fn new(band: FibBand) -> Self {
        Self { band }
    }

    /// `Impulsive` when Wave 2 retraces within the band and Wave 3 outruns Wave 1,
    /// `Corrective` otherwise. A flat Wave 1 is a [`AnalysisError::DegenerateWave`].
    pub fn classify(&self, candidate: &WaveCandidate) -> Result<WaveLabel, AnalysisError> {
        let len1 = candidate.wave_1.length();
        if len1 == 0.0 {
            return Err(AnalysisError::DegenerateWave {
                price: candidate.wave_1.start_price(),
            });
        }

        let retracement = candidate.wave_2.length() / len1;
        let is_impulsive = self.band.contains(retracement) && candidate.wave_3.length() > len1;

        Ok(if is_impulsive {
            WaveLabel::Impulsive
        } else {
            WaveLabel::Corrective
        })
    }

    /// As [`classify`](Self::classify), with a missing candidate mapped to `InsufficientData`.
    pub fn classify_pattern(
        &self,
        candidate: Option<&WaveCandidate>,
    ) -> Result<WaveLabel, AnalysisError> {
        match candidate {
            Some(c) => self.classify(c),
            None => Ok(WaveLabel::InsufficientData),
        }
    }
}
